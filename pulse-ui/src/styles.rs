#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-pulse-ui]";

/// Default CSS for the form along with easy-to-override design tokens.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --pulse-font-family: 'Helvetica Neue', system-ui, -apple-system, 'Segoe UI', sans-serif;
  --pulse-bg: #0e1117;
  --pulse-card-bg: #161b22;
  --pulse-card-border: rgba(148, 163, 184, 0.22);
  --pulse-radius: 10px;
  --pulse-text: #e6edf3;
  --pulse-muted: #9aa4b2;
  --pulse-accent: #ff4b4b;
  --pulse-accent-hover: #ff1c1c;
  --pulse-risk: #ff4b4b;
  --pulse-risk-bg: rgba(255, 75, 75, 0.12);
  --pulse-healthy: #21c55d;
  --pulse-healthy-bg: rgba(33, 197, 93, 0.12);
  --pulse-info-bg: rgba(59, 130, 246, 0.12);
  --pulse-warning-bg: rgba(234, 179, 8, 0.12);
}

@keyframes pulse-beat {
  0% { transform: scale(1); }
  50% { transform: scale(1.1); }
  100% { transform: scale(1); }
}

.pulse-root {
  font-family: var(--pulse-font-family);
  background: var(--pulse-bg);
  color: var(--pulse-text);
  display: grid;
  grid-template-columns: minmax(220px, 0.6fr) minmax(420px, 2fr);
  gap: 28px;
  padding: 28px;
  border-radius: var(--pulse-radius);
}

.pulse-sidebar {
  display: flex;
  flex-direction: column;
  gap: 16px;
}

.pulse-title h1 {
  color: var(--pulse-accent);
  margin: 0;
}

.pulse-heart {
  display: inline-block;
  animation: pulse-beat 2s infinite;
  margin-right: 10px;
}

.pulse-tagline {
  color: var(--pulse-muted);
  font-style: italic;
}

.pulse-section {
  background: var(--pulse-card-bg);
  border: 1px solid var(--pulse-card-border);
  border-radius: var(--pulse-radius);
  padding: 16px 20px;
  margin-bottom: 16px;
}

.pulse-section h3 {
  margin-top: 0;
}

.pulse-fields {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
  gap: 14px 20px;
}

.pulse-field label {
  display: block;
  font-weight: 600;
  margin-bottom: 6px;
}

.pulse-field input,
.pulse-field select {
  width: 100%;
  border-radius: var(--pulse-radius);
  border: 1px solid var(--pulse-card-border);
  background: var(--pulse-bg);
  color: var(--pulse-text);
  padding: 8px 10px;
}

.pulse-field .pulse-help {
  color: var(--pulse-muted);
  font-size: 0.85em;
  margin-top: 4px;
}

.pulse-flag {
  display: flex;
  gap: 14px;
}

.pulse-button {
  background-color: var(--pulse-accent);
  color: white;
  border-radius: 8px;
  height: 3em;
  width: 100%;
  font-weight: 600;
  border: none;
  cursor: pointer;
  transition: 0.3s;
}

.pulse-button:hover {
  background-color: var(--pulse-accent-hover);
  transform: translateY(-2px);
}

.pulse-profiles {
  display: grid;
  grid-template-columns: 1fr 1fr;
  gap: 10px;
}

.pulse-note {
  border-radius: var(--pulse-radius);
  padding: 12px 14px;
}

.pulse-note[data-level="info"] {
  background: var(--pulse-info-bg);
}

.pulse-note[data-level="warning"] {
  background: var(--pulse-warning-bg);
}

.pulse-note[data-level="error"] {
  background: var(--pulse-risk-bg);
  color: var(--pulse-risk);
}

.pulse-result {
  display: grid;
  grid-template-columns: 3fr 1fr;
  gap: 20px;
  border-top: 1px solid var(--pulse-card-border);
  padding-top: 20px;
}

.pulse-verdict[data-verdict="high_risk"] {
  background: var(--pulse-risk-bg);
  color: var(--pulse-risk);
}

.pulse-verdict[data-verdict="healthy"] {
  background: var(--pulse-healthy-bg);
  color: var(--pulse-healthy);
}

.pulse-verdict {
  border-radius: var(--pulse-radius);
  padding: 14px 18px;
}

.pulse-gauge progress {
  width: 100%;
  height: 14px;
}

@media (max-width: 900px) {
  .pulse-root {
    grid-template-columns: 1fr;
  }

  .pulse-result {
    grid-template-columns: 1fr;
  }
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document has no <head> element"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-pulse-ui", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
