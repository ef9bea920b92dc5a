use stockdash_core::dashboard::DashboardView;

/// Renders the full page. The view is embedded as JSON and drawn client-side with Plotly.js.
pub fn render(view: &DashboardView) -> anyhow::Result<String> {
    let json = serde_json::to_string(view)?;
    Ok(TEMPLATE
        .replace("__PAGE_TITLE__", &escape_html(view.page_title))
        .replace("__HEADING__", &escape_html(view.heading))
        .replace("__DASHBOARD_JSON__", &escape_script_json(&json)))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// Keeps `</script>` (and `<!--`) inside string values from closing the data block.
fn escape_script_json(json: &str) -> String {
    json.replace('<', "\\u003c")
}

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>__PAGE_TITLE__</title>
<script src="https://cdn.plot.ly/plotly-2.35.2.min.js" charset="utf-8"></script>
<style>
  body { font-family: "Source Sans Pro", system-ui, sans-serif; margin: 0; color: #31333f; }
  main { padding: 2rem 3rem; max-width: none; }
  h1 { font-size: 2.4rem; margin: 0 0 1.5rem; }
  h2 { font-size: 1.6rem; margin: 2rem 0 0.75rem; }
  .chart { width: 100%; min-height: 450px; }
  .error { background: #ffecec; color: #7d1a1a; padding: 0.75rem 1rem; border-radius: 0.4rem; }
  label { display: block; font-size: 0.9rem; margin-bottom: 0.3rem; }
  select { font-size: 1rem; padding: 0.4rem; min-width: 14rem; margin-bottom: 1rem; }
  table { border-collapse: collapse; margin-bottom: 1.5rem; }
  th, td { border: 1px solid #e6e9ef; padding: 0.35rem 0.8rem; text-align: left; }
  th { background: #f0f2f6; }
  td.num { text-align: right; font-variant-numeric: tabular-nums; }
</style>
</head>
<body>
<main>
<h1>__HEADING__</h1>
<div id="sections"></div>
</main>
<script id="dashboard-data" type="application/json">__DASHBOARD_JSON__</script>
<script>
(function () {
  const view = JSON.parse(document.getElementById("dashboard-data").textContent);
  const root = document.getElementById("sections");

  function el(tag, attrs, text) {
    const node = document.createElement(tag);
    Object.entries(attrs || {}).forEach(([k, v]) => node.setAttribute(k, v));
    if (text !== undefined && text !== null) node.textContent = String(text);
    return node;
  }

  function moversTable(rows) {
    const table = el("table");
    const head = el("tr");
    ["Ticker", "Monthly_Return", "Rank", "Type"].forEach((h) => head.appendChild(el("th", {}, h)));
    table.appendChild(head);
    rows.forEach((r) => {
      const tr = el("tr");
      tr.appendChild(el("td", {}, r.ticker));
      tr.appendChild(el("td", { class: "num" }, r.monthly_return));
      tr.appendChild(el("td", { class: "num" }, r.rank));
      tr.appendChild(el("td", {}, r.type));
      table.appendChild(tr);
    });
    return table;
  }

  view.sections.forEach((section) => {
    const wrap = el("section", { id: section.id });
    wrap.appendChild(el("h2", {}, section.heading));
    root.appendChild(wrap);

    if (section.kind === "error") {
      wrap.appendChild(el("div", { class: "error" }, section.message));
    } else if (section.kind === "chart") {
      const div = el("div", { class: "chart" });
      wrap.appendChild(div);
      Plotly.newPlot(div, section.figure.data, section.figure.layout, { responsive: true });
    } else if (section.kind === "movers") {
      const label = el("label", { for: "month" }, "Select Month");
      const select = el("select", { id: "month" });
      section.months.forEach((m) => {
        const opt = el("option", { value: m }, m);
        if (m === section.selected) opt.selected = true;
        select.appendChild(opt);
      });
      select.addEventListener("change", () => {
        const params = new URLSearchParams(window.location.search);
        params.set("month", select.value);
        window.location.search = params.toString();
      });
      wrap.appendChild(label);
      wrap.appendChild(select);
      wrap.appendChild(el("p", {}, "Top 5 Gainers")).style.fontWeight = "bold";
      wrap.appendChild(moversTable(section.gainers));
      wrap.appendChild(el("p", {}, "Top 5 Losers")).style.fontWeight = "bold";
      wrap.appendChild(moversTable(section.losers));
    }
  });
})();
</script>
</body>
</html>
"##;
