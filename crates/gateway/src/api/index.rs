use axum::response::{Html, IntoResponse};

pub async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>MirrorLoop</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; background: #0d1117; color: #c9d1d9; }
  h1 { color: #58a6ff; }
  h2 { color: #79c0ff; border-bottom: 1px solid #21262d; padding-bottom: 0.3em; margin-top: 2em; }
  textarea { width: 100%; min-height: 7rem; background: #161b22; color: #c9d1d9; border: 1px solid #30363d; border-radius: 6px; padding: 0.6rem; font-size: 1rem; }
  button { background: #238636; color: #fff; border: 0; border-radius: 6px; padding: 0.5rem 1rem; margin: 0.5rem 0.5rem 0 0; cursor: pointer; }
  button:disabled { opacity: 0.5; cursor: default; }
  .card { background: #161b22; border: 1px solid #30363d; border-radius: 6px; padding: 1rem; margin: 0.5rem 0; white-space: pre-wrap; }
  .label { color: #8b949e; font-size: 0.85em; }
  .error { color: #f85149; }
</style>
</head>
<body>
<h1>MirrorLoop</h1>
<textarea id="input" placeholder="今日の気持ちを書いてください"></textarea>
<div>
  <button id="reflect">振り返る</button>
  <button id="analyze">詳しく分析</button>
  <button id="speak" disabled>読み上げ</button>
  <button id="weekly">週報</button>
</div>

<h2>結果</h2>
<div id="result"></div>

<script>
const $ = (id) => document.getElementById(id);
let lastSpoken = "";

async function post(path, body) {
  const res = await fetch(path, {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(body || {}),
  });
  return res;
}

function showError(msg) {
  $("result").innerHTML = "";
  const div = document.createElement("div");
  div.className = "card error";
  div.textContent = msg;
  $("result").appendChild(div);
}

function render(reply) {
  $("result").innerHTML = "";
  const spoken = [];
  for (const [key, value] of Object.entries(reply)) {
    const card = document.createElement("div");
    card.className = "card";
    const label = document.createElement("div");
    label.className = "label";
    label.textContent = key;
    const text = document.createElement("div");
    text.textContent = Array.isArray(value) ? value.join("\n") : String(value);
    card.append(label, text);
    $("result").appendChild(card);
    if (typeof value === "string" && value) spoken.push(value);
    if (Array.isArray(value)) spoken.push(...value);
  }
  lastSpoken = spoken.join("。");
  $("speak").disabled = !lastSpoken;
}

async function reflect(path) {
  const res = await post(path, { user_input: $("input").value });
  const data = await res.json();
  if (!res.ok) return showError(data.error || res.statusText);
  render(data.reply);
}

$("reflect").onclick = () => reflect("/reflect");
$("analyze").onclick = () => reflect("/analyze");

$("weekly").onclick = async () => {
  const res = await post("/weekly_report");
  const data = await res.json();
  if (!res.ok) return showError(data.error || res.statusText);
  render({ report: data.report, entries: data.stats.entries });
};

$("speak").onclick = async () => {
  const res = await post("/tts", { text: lastSpoken });
  if (!res.ok) {
    const data = await res.json();
    return showError(data.error || res.statusText);
  }
  const blob = await res.blob();
  new Audio(URL.createObjectURL(blob)).play();
};
</script>
</body>
</html>
"#;
