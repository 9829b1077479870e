//! Event rendering registry.
//!
//! Maps each chat event kind to its presentation. The match below is the
//! registry: every kind has exactly one renderer, and unrecognized shapes
//! fall back to plain text. Rendering is pure - no network, no mutation.

use colored::Colorize;
use serde_json::Value;

use crate::events::{ChatEvent, workflow_text};
use crate::palette;
use crate::utils::{pretty_json, truncate_with_ellipsis};

const ARGUMENT_PREVIEW_LEN: usize = 80;

/// Render one event into display lines.
#[must_use]
pub fn render_event(event: &ChatEvent) -> Vec<String> {
    match event {
        ChatEvent::User { content, .. } => render_user(content),
        ChatEvent::Assistant {
            content,
            agent_name,
            ..
        } => render_assistant(content, agent_name.as_deref()),
        ChatEvent::Chunk {
            chunk, is_final, ..
        } => render_chunk(chunk, *is_final),
        ChatEvent::Completed { content, usage, .. } => {
            render_completed(content, usage.as_ref().and_then(|usage| usage.cost))
        }
        ChatEvent::ToolCallStarted {
            tool_name,
            arguments,
            ..
        } => render_tool_call(tool_name, arguments),
        ChatEvent::ToolResult {
            tool_name,
            result,
            success,
            execution_time,
            ..
        } => render_tool_result(tool_name, result, *success, *execution_time),
        ChatEvent::WorkflowResult {
            result,
            final_response,
            success,
            total_cost,
            ..
        } => render_workflow(result.as_ref(), final_response.as_deref(), *success, *total_cost),
        ChatEvent::Raw(value) => render_raw(value),
    }
}

// === Renderers ===

fn render_user(content: &str) -> Vec<String> {
    let (r, g, b) = palette::BLUE_RGB;
    vec![format!("{} {}", "you".truecolor(r, g, b).bold(), content)]
}

fn render_assistant(content: &str, agent_name: Option<&str>) -> Vec<String> {
    let (r, g, b) = palette::MAGENTA_RGB;
    let name = agent_name.unwrap_or("agent");
    vec![format!("{} {}", name.truecolor(r, g, b).bold(), content)]
}

fn render_chunk(chunk: &str, is_final: bool) -> Vec<String> {
    if is_final {
        vec![chunk.to_string()]
    } else {
        vec![chunk.to_string(), "…".dimmed().to_string()]
    }
}

fn render_completed(content: &str, cost: Option<f64>) -> Vec<String> {
    let mut lines = vec![content.to_string()];
    if let Some(cost) = cost {
        let (r, g, b) = palette::SLATE_RGB;
        lines.push(format!("cost ${cost:.4}").truecolor(r, g, b).to_string());
    }
    lines
}

fn render_tool_call(tool_name: &str, arguments: &Value) -> Vec<String> {
    let (r, g, b) = palette::YELLOW_RGB;
    let preview = truncate_with_ellipsis(&arguments.to_string(), ARGUMENT_PREVIEW_LEN, "…");
    vec![format!(
        "{} {} {}",
        "⚙".truecolor(r, g, b),
        format!("calling {tool_name}…").truecolor(r, g, b),
        preview.dimmed()
    )]
}

fn render_tool_result(
    tool_name: &str,
    result: &Value,
    success: bool,
    execution_time: Option<f64>,
) -> Vec<String> {
    let marker = if success {
        let (r, g, b) = palette::GREEN_RGB;
        "✓".truecolor(r, g, b).to_string()
    } else {
        let (r, g, b) = palette::RED_RGB;
        "✗".truecolor(r, g, b).to_string()
    };
    let timing = execution_time
        .map(|seconds| format!(" ({seconds:.2}s)"))
        .unwrap_or_default();
    let body = match result.as_str() {
        Some(text) => text.to_string(),
        None => result.to_string(),
    };
    vec![format!(
        "{marker} {tool_name}{timing}: {}",
        truncate_with_ellipsis(&body, 200, "…")
    )]
}

fn render_workflow(
    result: Option<&Value>,
    final_response: Option<&str>,
    success: bool,
    total_cost: Option<f64>,
) -> Vec<String> {
    let text = workflow_text(result, final_response);
    let mut lines = if success {
        vec![text]
    } else {
        let (r, g, b) = palette::RED_RGB;
        vec![format!("{} {text}", "workflow failed".truecolor(r, g, b).bold())]
    };
    if let Some(cost) = total_cost {
        let (r, g, b) = palette::SLATE_RGB;
        lines.push(format!("total cost ${cost:.4}").truecolor(r, g, b).to_string());
    }
    lines
}

fn render_raw(value: &Value) -> Vec<String> {
    match value.as_str() {
        Some(text) => vec![text.to_string()],
        None => vec![pretty_json(value)],
    }
}
