// Dashboard page
// Self-contained HTML served at the root route. The page previews the
// chosen CSV locally, posts it to the upload endpoint and renders the
// flagged rows, an amount histogram and a transaction-type filter without
// any build step or external assets.

pub fn render_dashboard() -> &'static str {
    DASHBOARD_HTML
}

const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
<title>Revenue Leakage Detection</title>
<style>
:root {
  --bg: #0b1220;
  --surface: #0f172a;
  --card: #ffffff;
  --ink: #0f172a;
  --muted: #64748b;
  --border: #e2e8f0;
  --shadow: rgba(15, 23, 42, 0.14);
  --accent: #2563eb;
  --bar: #17a2b8;
  --danger: #dc2626;
  --ok: #16a34a;
}
* { box-sizing: border-box; }
body {
  margin: 0;
  font-family: "IBM Plex Sans", "Source Sans 3", sans-serif;
  background: radial-gradient(circle at top, #1e293b 0%, #0f172a 55%, #0b1220 100%);
  color: #e2e8f0;
}
.page { max-width: 1100px; margin: 0 auto; padding: 32px 20px 48px; }
.hero {
  background: linear-gradient(135deg, rgba(37,99,235,0.18), rgba(15,23,42,0.95));
  border-radius: 20px;
  padding: 28px;
  box-shadow: 0 18px 40px rgba(15, 23, 42, 0.35);
}
.hero h1 {
  margin: 0 0 6px;
  font-size: 26px;
  font-family: "Sora", "IBM Plex Sans", sans-serif;
  letter-spacing: 0.01em;
}
.hero p { margin: 0; color: #94a3b8; font-size: 14px; }
.panel {
  background: var(--card);
  color: var(--ink);
  border-radius: 16px;
  padding: 20px;
  margin-top: 18px;
  box-shadow: 0 12px 28px var(--shadow);
}
.panel h2 {
  margin: 0 0 12px;
  font-size: 16px;
  letter-spacing: 0.04em;
}
.upload-row {
  display: flex;
  flex-wrap: wrap;
  gap: 12px;
  align-items: center;
}
.upload-row input[type="file"] {
  flex: 1 1 280px;
  border: 1px dashed var(--border);
  border-radius: 12px;
  padding: 12px;
  font-size: 14px;
  background: #f8fafc;
}
.upload-row button {
  border: none;
  background: var(--accent);
  color: white;
  font-size: 14px;
  font-weight: 600;
  padding: 12px 22px;
  border-radius: 12px;
  cursor: pointer;
}
.upload-row button:disabled { opacity: 0.55; cursor: wait; }
.hint { margin: 10px 0 0; color: var(--muted); font-size: 12px; }
.notice {
  display: none;
  margin-top: 14px;
  padding: 12px 14px;
  border-radius: 12px;
  font-size: 14px;
}
.notice.busy { display: block; background: #eff6ff; color: #1d4ed8; }
.notice.ok { display: block; background: #f0fdf4; color: #15803d; }
.notice.error { display: block; background: #fef2f2; color: #b91c1c; }
.summary {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(170px, 1fr));
  gap: 12px;
  margin-bottom: 16px;
}
.card {
  background: #f8fafc;
  border: 1px solid var(--border);
  padding: 14px 16px;
  border-radius: 14px;
}
.card .label {
  font-size: 11px;
  text-transform: uppercase;
  letter-spacing: 0.12em;
  color: var(--muted);
}
.card .value {
  font-size: 20px;
  font-weight: 700;
  margin-top: 6px;
  word-break: break-all;
}
.table-wrap { overflow-x: auto; border: 1px solid var(--border); border-radius: 12px; }
.table { width: 100%; border-collapse: collapse; font-size: 13px; }
.table thead th {
  text-align: left;
  font-size: 11px;
  letter-spacing: 0.12em;
  text-transform: uppercase;
  color: #64748b;
  background: #f1f5f9;
  padding: 10px 12px;
  white-space: nowrap;
}
.table tbody td {
  padding: 9px 12px;
  border-top: 1px solid var(--border);
  font-variant-numeric: tabular-nums;
  white-space: nowrap;
}
.table tbody tr:nth-child(even) { background: #f8fafc; }
.chart {
  display: flex;
  align-items: flex-end;
  gap: 2px;
  height: 160px;
  padding: 8px 4px 0;
  border: 1px solid var(--border);
  border-radius: 12px;
  background: #f8fafc;
}
.chart .bin { flex: 1 1 0; background: var(--bar); border-radius: 2px 2px 0 0; min-height: 1px; }
.axis {
  display: flex;
  justify-content: space-between;
  color: var(--muted);
  font-size: 11px;
  margin-top: 6px;
}
.filter-row { display: flex; gap: 10px; align-items: center; margin-bottom: 12px; }
.filter-row label { font-size: 13px; color: var(--muted); }
.filter-row select {
  border: 1px solid var(--border);
  border-radius: 10px;
  padding: 8px 10px;
  font-size: 13px;
  background: white;
}
.footer { margin-top: 16px; color: #64748b; font-size: 12px; }
section[hidden] { display: none; }
@media (max-width: 680px) {
  .upload-row { flex-direction: column; align-items: stretch; }
}
</style>
</head>
<body>
<div class="page">
  <section class="hero">
    <h1>Revenue Leakage Detection Dashboard</h1>
    <p>Detect anomalies and prevent revenue loss. Upload a batch of transactions to score it.</p>
  </section>

  <section class="panel">
    <h2>Upload your financial transactions CSV file</h2>
    <div class="upload-row">
      <input id="file" type="file" accept=".csv,.gz" />
      <button id="analyze" type="button">Analyze</button>
    </div>
    <p class="hint">Ensure your file contains valid financial transaction data. Gzip-compressed CSV is accepted.</p>
    <div id="notice" class="notice"></div>
  </section>

  <section class="panel" id="preview-panel" hidden>
    <h2>Uploaded Data Preview</h2>
    <div class="table-wrap">
      <table class="table">
        <thead id="preview-head"></thead>
        <tbody id="preview-body"></tbody>
      </table>
    </div>
  </section>

  <section class="panel" id="results-panel" hidden>
    <div class="summary">
      <div class="card"><div class="label">Rows Analyzed</div><div class="value" id="sum-rows">0</div></div>
      <div class="card"><div class="label">Anomalies</div><div class="value" id="sum-anomalies">0</div></div>
      <div class="card"><div class="label">Feature Columns</div><div class="value" id="sum-features">-</div></div>
      <div class="card"><div class="label">Upload Key</div><div class="value" id="sum-key">-</div></div>
    </div>

    <h2>Detected Anomalies</h2>
    <div class="filter-row" id="filter-row" hidden>
      <label for="type-filter">Select Transaction Type</label>
      <select id="type-filter"></select>
    </div>
    <div class="table-wrap">
      <table class="table">
        <thead id="anomaly-head"></thead>
        <tbody id="anomaly-body"></tbody>
      </table>
    </div>

    <section id="chart-section">
      <h2 style="margin-top:18px;">Anomaly Distribution</h2>
      <div class="chart" id="chart"></div>
      <div class="axis"><span id="axis-min"></span><span>Anomalous Transaction Amounts</span><span id="axis-max"></span></div>
    </section>
  </section>

  <div class="footer">Each upload is scored in isolation with a model fitted to that batch alone.</div>
</div>
<script>
  const input = document.getElementById('file');
  const analyzeButton = document.getElementById('analyze');
  const notice = document.getElementById('notice');
  const previewPanel = document.getElementById('preview-panel');
  const resultsPanel = document.getElementById('results-panel');
  const filterRow = document.getElementById('filter-row');
  const typeFilter = document.getElementById('type-filter');
  const chartSection = document.getElementById('chart-section');

  let anomalyColumns = [];
  let anomalyRows = [];

  function setNotice(kind, text) {
    notice.className = 'notice' + (kind ? ' ' + kind : '');
    notice.textContent = text || '';
  }

  function clearChildren(node) {
    while (node.firstChild) node.removeChild(node.firstChild);
  }

  function renderHead(head, columns) {
    clearChildren(head);
    const tr = document.createElement('tr');
    columns.forEach(column => {
      const th = document.createElement('th');
      th.textContent = column;
      tr.appendChild(th);
    });
    head.appendChild(tr);
  }

  function renderRows(body, columns, rows) {
    clearChildren(body);
    rows.forEach(row => {
      const tr = document.createElement('tr');
      columns.forEach(column => {
        const td = document.createElement('td');
        const value = row[column];
        td.textContent = value === undefined || value === null ? '' : String(value);
        tr.appendChild(td);
      });
      body.appendChild(tr);
    });
  }

  function previewFile(file) {
    previewPanel.hidden = false;
    const head = document.getElementById('preview-head');
    const body = document.getElementById('preview-body');
    if (file.name.endsWith('.gz')) {
      renderHead(head, ['Preview']);
      renderRows(body, ['Preview'], [{ Preview: 'Compressed upload, preview unavailable.' }]);
      return;
    }
    const reader = new FileReader();
    reader.onload = () => {
      const lines = String(reader.result).split(/\r?\n/).filter(line => line.length > 0);
      if (lines.length === 0) return;
      const columns = lines[0].split(',');
      const rows = lines.slice(1, 6).map(line => {
        const cells = line.split(',');
        const row = {};
        columns.forEach((column, index) => { row[column] = cells[index]; });
        return row;
      });
      renderHead(head, columns);
      renderRows(body, columns, rows);
    };
    reader.readAsText(file.slice(0, 65536));
  }

  function renderChart(rows) {
    const amounts = rows
      .map(row => Number(row['Amount']))
      .filter(value => Number.isFinite(value));
    if (amounts.length === 0) {
      chartSection.hidden = true;
      return;
    }
    chartSection.hidden = false;
    const bins = 50;
    const min = Math.min.apply(null, amounts);
    const max = Math.max.apply(null, amounts);
    const span = max - min || 1;
    const counts = new Array(bins).fill(0);
    amounts.forEach(value => {
      let index = Math.floor(((value - min) / span) * bins);
      if (index >= bins) index = bins - 1;
      counts[index] += 1;
    });
    const peak = Math.max.apply(null, counts) || 1;
    const chart = document.getElementById('chart');
    clearChildren(chart);
    counts.forEach(count => {
      const bar = document.createElement('div');
      bar.className = 'bin';
      bar.style.height = Math.round((count / peak) * 100) + '%';
      bar.title = String(count);
      chart.appendChild(bar);
    });
    document.getElementById('axis-min').textContent = min.toFixed(4);
    document.getElementById('axis-max').textContent = max.toFixed(4);
  }

  function applyTypeFilter() {
    const selected = typeFilter.value;
    const rows = selected === 'All'
      ? anomalyRows
      : anomalyRows.filter(row => String(row['type']) === selected);
    renderRows(document.getElementById('anomaly-body'), anomalyColumns, rows);
    renderChart(rows);
  }

  function renderTypeFilter(columns, rows) {
    if (!columns.includes('type')) {
      filterRow.hidden = true;
      return;
    }
    filterRow.hidden = false;
    clearChildren(typeFilter);
    const seen = [];
    rows.forEach(row => {
      const value = String(row['type']);
      if (!seen.includes(value)) seen.push(value);
    });
    ['All'].concat(seen).forEach(value => {
      const option = document.createElement('option');
      option.value = value;
      option.textContent = value;
      typeFilter.appendChild(option);
    });
  }

  function renderResults(data) {
    anomalyColumns = data.columns || [];
    anomalyRows = data.anomalies || [];
    const summary = data.summary || {};

    resultsPanel.hidden = false;
    document.getElementById('sum-rows').textContent = String(summary.rows || 0);
    document.getElementById('sum-anomalies').textContent = String(summary.anomaly_count || 0);
    document.getElementById('sum-features').textContent =
      (summary.feature_columns || []).join(', ') || '-';
    document.getElementById('sum-key').textContent = summary.upload_key || '-';

    renderHead(document.getElementById('anomaly-head'), anomalyColumns);
    renderRows(document.getElementById('anomaly-body'), anomalyColumns, anomalyRows);
    renderTypeFilter(anomalyColumns, anomalyRows);
    renderChart(anomalyRows);

    if (anomalyRows.length === 0) {
      setNotice('ok', 'No anomalies detected in the transactions.');
    } else {
      setNotice('ok', 'Analysis complete! Review detected anomalies and take corrective actions.');
    }
  }

  function analyze() {
    if (!input.files.length) {
      setNotice('error', 'Choose a CSV file first.');
      return;
    }
    const form = new FormData();
    form.append('file', input.files[0]);

    analyzeButton.disabled = true;
    setNotice('busy', 'Analyzing transactions...');
    resultsPanel.hidden = true;

    fetch('/v1/uploads', { method: 'POST', body: form })
      .then(async response => {
        const body = await response.json().catch(() => ({}));
        if (!response.ok) {
          throw new Error(body.message || 'upload rejected');
        }
        return body;
      })
      .then(renderResults)
      .catch(err => {
        setNotice('error', 'Failed to process file. Please try again. (' + err.message + ')');
      })
      .finally(() => {
        analyzeButton.disabled = false;
      });
  }

  input.addEventListener('change', () => {
    setNotice('', '');
    resultsPanel.hidden = true;
    if (input.files.length) previewFile(input.files[0]);
  });
  analyzeButton.addEventListener('click', analyze);
  typeFilter.addEventListener('change', applyTypeFilter);
</script>
</body>
</html>"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_page_posts_to_the_upload_endpoint() {
        let page = render_dashboard();
        assert!(page.contains("/v1/uploads"));
        assert!(page.contains("name=\"viewport\""));
        assert!(page.contains("Analyzing transactions..."));
        assert!(page.contains("No anomalies detected in the transactions."));
        assert!(page.contains("Failed to process file. Please try again."));
    }
}
