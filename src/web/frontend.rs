//! Embedded HTML/CSS/JS frontend for the sentidash web dashboard.
//!
//! The entire page is compiled into the binary as a string constant. Charts
//! are drawn as inline SVG from `/api/chart` snapshots.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>sentidash</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --grey: #8b949e;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body { background: var(--bg); color: var(--text); font-family: var(--font); font-size: 14px; line-height: 1.5; }
.app { max-width: 1100px; margin: 0 auto; padding: 24px; }
header { display: flex; align-items: center; justify-content: space-between; margin-bottom: 24px; padding-bottom: 16px; border-bottom: 1px solid var(--border); }
header h1 { font-size: 22px; font-weight: 600; }
.status { font-size: 12px; color: var(--text-muted); }
.status .dot { display: inline-block; width: 8px; height: 8px; border-radius: 50%; margin-right: 6px; background: var(--grey); }
.status .dot.up { background: var(--green); }
.status .dot.down { background: var(--red); }

.grid { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }
.card { background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius); padding: 16px; }
.card h2 { font-size: 14px; font-weight: 600; margin-bottom: 12px; color: var(--text-muted); text-transform: uppercase; letter-spacing: .04em; }
.wide { grid-column: 1 / -1; }

textarea { width: 100%; min-height: 110px; resize: vertical; background: var(--bg); color: var(--text); border: 1px solid var(--border); border-radius: var(--radius); padding: 10px; font: inherit; }
.controls { display: flex; gap: 8px; margin-top: 10px; flex-wrap: wrap; }
.examples { display: flex; gap: 6px; margin-top: 10px; flex-wrap: wrap; align-items: center; font-size: 12px; }
.examples button { padding: 3px 10px; border-radius: 12px; font-size: 12px; }
button { background: var(--surface); color: var(--text); border: 1px solid var(--border); border-radius: 6px; padding: 6px 14px; cursor: pointer; font: inherit; }
button:hover { border-color: var(--accent); }
button.primary { background: var(--accent); border-color: var(--accent); color: #0d1117; font-weight: 600; }
button.active { border-color: var(--accent); color: var(--accent); }
button:disabled { opacity: .5; cursor: wait; }

.result .headline { font-size: 20px; font-weight: 600; margin-bottom: 10px; }
.meter { height: 8px; background: var(--bg); border-radius: 4px; overflow: hidden; margin: 4px 0 10px; }
.meter > div { height: 100%; }
.muted { color: var(--text-muted); }
.positive { color: var(--green); }
.negative { color: var(--red); }
.neutral { color: var(--grey); }

.history-item { display: flex; justify-content: space-between; gap: 12px; padding: 8px 0; border-bottom: 1px solid var(--border); }
.history-item:last-child { border-bottom: none; }
.history-meta { font-size: 12px; color: var(--text-muted); white-space: nowrap; }

svg text { fill: var(--text-muted); font-size: 11px; }
.legend { display: flex; gap: 16px; margin-top: 8px; font-size: 12px; }
.legend span::before { content: '●'; margin-right: 4px; }
.legend .positive::before { color: var(--green); }
.legend .neutral::before { color: var(--grey); }
.legend .negative::before { color: var(--red); }

.toast { position: fixed; right: 24px; bottom: 24px; padding: 10px 16px; border-radius: var(--radius); background: var(--surface); border: 1px solid var(--border); opacity: 0; transition: opacity .2s; pointer-events: none; }
.toast.show { opacity: 1; }
.toast.success { border-color: var(--green); }
.toast.warning { border-color: var(--yellow); }
.toast.error { border-color: var(--red); }
</style>
</head>
<body>
<div class="app">
  <header>
    <h1>sentidash</h1>
    <div class="status"><span class="dot" id="health-dot"></span><span id="health-text">checking analyzer…</span></div>
  </header>

  <div class="grid">
    <section class="card">
      <h2>Text</h2>
      <textarea id="text" placeholder="Type or paste text to analyze"></textarea>
      <div class="controls">
        <button class="primary" id="btn-analyze">Analyze</button>
        <button id="btn-clear">Clear</button>
        <button id="btn-file">Upload File</button>
        <input type="file" id="file" accept=".txt,.csv,.json" style="display:none">
      </div>
      <div class="examples" id="examples">
        <span class="muted">Try:</span>
        <button class="example-btn" data-text="I absolutely love this product! It works perfectly and exceeded all my expectations.">Positive</button>
        <button class="example-btn" data-text="This is the worst service I have ever received. Totally disappointed and frustrated.">Negative</button>
        <button class="example-btn" data-text="The package arrived on Tuesday. It contains a manual and a charging cable.">Neutral</button>
        <button class="example-btn" data-text="The movie was okay, a few good scenes but the ending felt a bit rushed.">Mixed</button>
      </div>
    </section>

    <section class="card result" id="result">
      <h2>Result</h2>
      <p class="muted">Enter text above to see sentiment analysis results</p>
    </section>

    <section class="card wide">
      <h2>Sentiment</h2>
      <div class="controls" id="modes">
        <button data-mode="distribution">Distribution</button>
        <button data-mode="bar">Bar</button>
        <button data-mode="timeseries">Last 24h</button>
      </div>
      <div id="chart"></div>
      <div class="legend"><span class="positive">Positive</span><span class="neutral">Neutral</span><span class="negative">Negative</span></div>
    </section>

    <section class="card wide">
      <h2>Recent</h2>
      <div id="history"></div>
      <div class="controls">
        <button id="btn-export-history">Export History</button>
        <button id="btn-export-bundle">Export Chart Data</button>
      </div>
    </section>
  </div>
</div>
<div class="toast" id="toast"></div>

<script>
const COLORS = { positive: '#3fb950', neutral: '#8b949e', negative: '#f85149' };
const CHANNELS = ['positive', 'neutral', 'negative'];
let toastTimer = null;
let typingTimer = null;

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(method, path, body) {
  const opts = { method, headers: {} };
  if (body) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const res = await fetch(path, opts);
  return res.json();
}

function notify(n) {
  if (!n) return;
  const el = document.getElementById('toast');
  el.textContent = n.message;
  el.className = 'toast show ' + n.severity;
  clearTimeout(toastTimer);
  const ttl = Math.max(0, Date.parse(n.expires_at) - Date.parse(n.shown_at));
  toastTimer = setTimeout(() => el.className = 'toast', ttl);
}

function esc(s) {
  const d = document.createElement('div');
  d.textContent = s;
  return d.innerHTML;
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------
async function analyze(text) {
  const btn = document.getElementById('btn-analyze');
  btn.disabled = true;
  try {
    const res = await api('POST', '/api/analyze', { text });
    notify(res.notification);
    if (res.result) {
      renderResult(res.result);
      await Promise.all([loadChart(), loadHistory()]);
    }
  } catch (e) {
    notify({ severity: 'error', message: 'Failed to analyze text. Please check backend connection.', shown_at: 0, expires_at: 5000 });
  } finally {
    btn.disabled = false;
  }
}

function renderResult(r) {
  const polarityColor = COLORS[r.tone];
  document.getElementById('result').innerHTML = `
    <h2>Result</h2>
    <div class="headline ${r.tone}">${r.icon} ${esc(r.label)}</div>
    <div>Polarity <span class="muted">${r.polarity.toFixed(4)}</span></div>
    <div class="meter"><div style="width:${r.polarity_pct}%;background:${polarityColor}"></div></div>
    <div>Subjectivity <span class="muted">${r.subjectivity.toFixed(4)}</span></div>
    <div class="meter"><div style="width:${r.subjectivity_pct}%;background:#58a6ff"></div></div>
    <div>Words <span class="muted">${r.word_count}</span></div>
    ${r.matched_words.length ? `<div>Lexicon <span class="muted">${esc(r.matched_words.join(', '))}</span></div>` : ''}
    <p class="muted" style="margin-top:8px">"${esc(r.preview)}"</p>`;
}

function resetResult() {
  document.getElementById('result').innerHTML =
    '<h2>Result</h2><p class="muted">Enter text above to see sentiment analysis results</p>';
}

// ---------------------------------------------------------------------------
// Chart
// ---------------------------------------------------------------------------
async function loadChart() {
  renderChart(await api('GET', '/api/chart'));
}

async function switchMode(mode) {
  const res = await api('PUT', '/api/chart', { mode });
  if (res.error) return notify({ severity: 'error', message: res.error, shown_at: 0, expires_at: 5000 });
  renderChart(res);
}

function renderChart(snap) {
  document.querySelectorAll('#modes button').forEach(b =>
    b.classList.toggle('active', b.dataset.mode === snap.mode));
  const el = document.getElementById('chart');
  if (snap.mode === 'distribution') el.innerHTML = doughnut(snap.data.values);
  else if (snap.mode === 'bar') el.innerHTML = bars(snap.data.values);
  else el.innerHTML = lines(snap.labels, snap.data.values.buckets);
}

function doughnut(s) {
  const counts = CHANNELS.map(c => s[c]);
  const total = counts.reduce((a, b) => a + b, 0);
  const r = 70, cx = 110, cy = 90, circ = 2 * Math.PI * r;
  let offset = 0, arcs = '';
  if (total === 0) {
    arcs = `<circle cx="${cx}" cy="${cy}" r="${r}" fill="none" stroke="#30363d" stroke-width="28"/>`;
  }
  counts.forEach((c, i) => {
    if (!c) return;
    const len = c / total * circ;
    arcs += `<circle cx="${cx}" cy="${cy}" r="${r}" fill="none" stroke="${COLORS[CHANNELS[i]]}" stroke-width="28"
      stroke-dasharray="${len} ${circ - len}" stroke-dashoffset="${-offset}" transform="rotate(-90 ${cx} ${cy})"/>`;
    offset += len;
  });
  const pcts = [s.positivePercentage, s.neutralPercentage, s.negativePercentage];
  const legend = CHANNELS.map((c, i) =>
    `<text x="240" y="${60 + i * 22}">${c}: ${counts[i]} (${pcts[i].toFixed(1)}%)</text>`).join('');
  return `<svg width="100%" height="190" viewBox="0 0 480 190">${arcs}${legend}</svg>`;
}

function bars(s) {
  const counts = CHANNELS.map(c => s[c]);
  const max = Math.max(1, ...counts);
  const step = Math.ceil(max / 5);
  const top = Math.ceil(max / step) * step;
  const h = 150, base = 170, w = 80;
  let out = '';
  for (let v = 0; v <= top; v += step) {
    const y = base - v / top * h;
    out += `<line x1="40" x2="400" y1="${y}" y2="${y}" stroke="#30363d"/><text x="30" y="${y + 4}" text-anchor="end">${v}</text>`;
  }
  counts.forEach((c, i) => {
    const bh = c / top * h, x = 70 + i * 110;
    out += `<rect x="${x}" y="${base - bh}" width="${w}" height="${bh}" fill="${COLORS[CHANNELS[i]]}" rx="3"/>`;
    out += `<text x="${x + w / 2}" y="${base - bh - 6}" text-anchor="middle">${c}</text>`;
    out += `<text x="${x + w / 2}" y="${base + 16}" text-anchor="middle">${CHANNELS[i]}</text>`;
  });
  return `<svg width="100%" height="195" viewBox="0 0 420 195">${out}</svg>`;
}

function lines(labels, buckets) {
  if (buckets.length === 1 && labels[0] === 'No Data') {
    return '<p class="muted" style="padding:40px 0;text-align:center">No Data</p>';
  }
  const max = Math.max(1, ...buckets.map(b => Math.max(b.positive, b.neutral, b.negative)));
  const left = 30, right = 700, base = 160, h = 140;
  const dx = (right - left) / (buckets.length - 1);
  let out = '';
  CHANNELS.forEach(c => {
    const pts = buckets.map((b, i) => `${left + i * dx},${base - b[c] / max * h}`).join(' ');
    out += `<polyline points="${pts}" fill="none" stroke="${COLORS[c]}" stroke-width="2"/>`;
  });
  labels.forEach((l, i) => {
    if (i % 4 === 0) out += `<text x="${left + i * dx}" y="${base + 16}" text-anchor="middle">${l}</text>`;
  });
  out += `<text x="${left - 6}" y="${base - h + 4}" text-anchor="end">${max}</text>`;
  return `<svg width="100%" height="185" viewBox="0 0 720 185">${out}</svg>`;
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------
async function loadHistory() {
  const res = await api('GET', '/api/history?limit=10');
  const el = document.getElementById('history');
  if (!res.rows.length) {
    el.innerHTML = '<p class="muted">No analysis history yet</p>';
    return;
  }
  el.innerHTML = res.rows.map(r => `
    <div class="history-item">
      <div>${r.icon} ${esc(r.text)}</div>
      <div class="history-meta">${esc(r.sentiment)} · ${r.time}</div>
    </div>`).join('');
}

async function download(kind) {
  const res = await fetch('/api/export/' + kind);
  const blob = await res.blob();
  const disposition = res.headers.get('Content-Disposition') || '';
  const match = disposition.match(/filename="([^"]+)"/);
  const link = document.createElement('a');
  link.href = URL.createObjectURL(blob);
  link.download = match ? match[1] : 'sentiment-export.json';
  link.click();
  URL.revokeObjectURL(link.href);
  notify((await api('GET', '/api/notification')).notification);
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------
async function loadHealth() {
  try {
    const h = await api('GET', '/api/health');
    document.getElementById('health-dot').className = 'dot ' + (h.analyzer_reachable ? 'up' : 'down');
    document.getElementById('health-text').textContent =
      `${h.analyzer} · ${h.analyzer_reachable ? 'reachable' : 'unreachable'} · ${h.records}/${h.capacity} stored`;
  } catch (e) {
    document.getElementById('health-dot').className = 'dot down';
  }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------
const input = document.getElementById('text');

document.getElementById('btn-analyze').addEventListener('click', () => analyze(input.value));

document.getElementById('btn-clear').addEventListener('click', async () => {
  input.value = '';
  resetResult();
  notify((await api('POST', '/api/clear')).notification);
});

document.getElementById('examples').addEventListener('click', e => {
  if (!e.target.classList.contains('example-btn')) return;
  input.value = e.target.dataset.text;
  input.focus();
});

document.getElementById('btn-file').addEventListener('click', () => document.getElementById('file').click());
document.getElementById('file').addEventListener('change', async e => {
  if (!e.target.files.length) return;
  input.value = await e.target.files[0].text();
  analyze(input.value);
});

input.addEventListener('input', () => {
  clearTimeout(typingTimer);
  if (input.value.trim().length > 10) {
    typingTimer = setTimeout(() => analyze(input.value), 1000);
  }
});

document.getElementById('modes').addEventListener('click', e => {
  if (e.target.dataset.mode) switchMode(e.target.dataset.mode);
});

document.getElementById('btn-export-history').addEventListener('click', () => download('history'));
document.getElementById('btn-export-bundle').addEventListener('click', () => download('bundle'));

loadHealth();
loadChart();
loadHistory();
</script>
</body>
</html>
"##;
