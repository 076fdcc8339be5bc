use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderOptions {
    sanitize: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderResult {
    html: String,
    diagnostics: Vec<JsDiagnostic>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsDiagnostic {
    kind: String,
    code: String,
    message: String,
    line: usize,
    column: usize,
}

#[wasm_bindgen]
pub fn render_html(source: &str) -> Result<JsValue, JsValue> {
    render_html_with_options(source, JsValue::UNDEFINED)
}

#[wasm_bindgen]
pub fn render_html_with_options(source: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let options = options_from_js(options)?;
    let result = compile_to_result(source, &options);
    serde_wasm_bindgen::to_value(&result).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn options_from_js(value: JsValue) -> Result<tagdown_core::CompileOptions, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(tagdown_core::CompileOptions::default());
    }
    let parsed: RenderOptions =
        serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))?;
    let mut out = tagdown_core::CompileOptions::default();
    if let Some(sanitize) = parsed.sanitize {
        out.sanitize = sanitize;
    }
    Ok(out)
}

fn compile_to_result(source: &str, options: &tagdown_core::CompileOptions) -> RenderResult {
    match tagdown_core::compile_with_options(source, options) {
        Ok(html) => RenderResult {
            html,
            diagnostics: Vec::new(),
        },
        Err(err) => RenderResult {
            html: String::new(),
            diagnostics: err
                .diagnostics()
                .into_iter()
                .map(|diag| JsDiagnostic {
                    kind: diag.kind.as_str().to_string(),
                    code: diag.code.to_string(),
                    message: diag.message,
                    line: diag.position.line + 1,
                    column: diag.position.column + 1,
                })
                .collect(),
        },
    }
}
