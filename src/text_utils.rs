use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

use crate::ai::prompts::{ANALYSIS_MARKER, SCRIPT_MARKER};
use crate::pedido::{Field, PedidoRequest, PedidoResult};

/// Analysis shown when the model reply has no analysis section.
pub const MISSING_ANALYSIS: &str = "Análisis no generado.";

/// Split a model reply into script and analysis.
///
/// Everything before the first [`ANALYSIS_MARKER`] is the script, with
/// [`SCRIPT_MARKER`] removed. A reply without the analysis marker is
/// still usable: the whole text becomes the script and the analysis is
/// [`MISSING_ANALYSIS`].
pub fn split_response(raw: &str) -> PedidoResult {
    let (head, tail) = match raw.split_once(ANALYSIS_MARKER) {
        Some((head, tail)) => (head, Some(tail)),
        None => {
            trace!("analysis marker not found in reply");
            (raw, None)
        }
    };

    let guion = head.replace(SCRIPT_MARKER, "").trim().to_string();
    let analisis = match tail {
        Some(tail) => tail.trim().to_string(),
        None => MISSING_ANALYSIS.to_string(),
    };
    PedidoResult { guion, analisis }
}

/// Parse a filled-in form message into a request.
///
/// Each field starts on a line of the form `label: value`, optionally
/// numbered (`1.` or `1)`). Lines without a known label belong to the
/// previous field; lines before the first label are ignored. A field
/// given twice keeps the last value.
pub fn parse_form(text: &str) -> PedidoRequest {
    let mut req = PedidoRequest::default();
    let mut current: Option<Field> = None;

    for line in text.lines() {
        if let Some((field, value)) = parse_labeled_line(line) {
            trace!(?field, "form field");
            let slot = req.get_mut(field);
            slot.clear();
            slot.push_str(value.trim());
            current = Some(field);
            continue;
        }

        let Some(field) = current else {
            continue;
        };
        let slot = req.get_mut(field);
        if !slot.is_empty() || !line.trim().is_empty() {
            slot.push('\n');
            slot.push_str(line.trim_end());
        }
    }

    for field in Field::ALL {
        let slot = req.get_mut(field);
        let trimmed = slot.trim().to_string();
        *slot = trimmed;
    }
    req
}

/// Drop a leading bot command (`/pedido`, `/pedido@bot`) from a message.
pub fn strip_command(text: &str) -> &str {
    let trimmed = text.trim_start();
    if !trimmed.starts_with('/') {
        return text;
    }
    match trimmed.find(char::is_whitespace) {
        Some(idx) => &trimmed[idx..],
        None => "",
    }
}

fn parse_labeled_line(line: &str) -> Option<(Field, &str)> {
    let rest = strip_numbering(line.trim_start());
    let (label, value) = rest.split_once(':')?;
    let label = label.trim().trim_start_matches('¿').trim_end_matches('?');
    Field::from_label(label).map(|field| (field, value))
}

fn strip_numbering(line: &str) -> &str {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return line;
    }
    match line[digits..].strip_prefix(['.', ')']) {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

/// Blank form for the user to fill in.
pub fn form_template() -> String {
    Field::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| format!("{}. {}: ", i + 1, field.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split text into chunks of at most `limit` characters without breaking
/// grapheme clusters. Prefers to cut after a newline when one is close.
pub fn chunk_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    let mut last_newline: Option<usize> = None;

    for grapheme in text.graphemes(true) {
        let len = grapheme.chars().count();
        if current_len + len > limit && !current.is_empty() {
            match last_newline {
                Some(cut) if cut > 0 => {
                    let rest = current.split_off(cut);
                    chunks.push(std::mem::take(&mut current));
                    current = rest;
                }
                _ => chunks.push(std::mem::take(&mut current)),
            }
            current_len = current.chars().count();
            last_newline = None;
            // The tail carried over from a newline cut may still leave no room.
            if current_len + len > limit && !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
        }
        current.push_str(grapheme);
        current_len += len;
        if grapheme.contains('\n') {
            last_newline = Some(current.len());
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
