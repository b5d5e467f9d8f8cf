//! HTML rendering for the form page and its verdict meter.

use crate::forms::{FormKind, NumericField};
use crate::types::submission::FormSubmission;
use crate::types::verdict::Verdict;
use std::fmt::Write;

/// What to show under the form
#[derive(Debug, Clone, Copy)]
pub enum Outcome<'a> {
    /// No submission yet
    Empty,
    /// Prediction succeeded
    Verdict(&'a Verdict),
    /// Input rejected before inference
    Invalid(&'a str),
    /// Inference failed
    Failure,
}

const STYLE: &str = r#"
body { background: #1e3c72; color: #fff; font-family: 'Segoe UI', Tahoma, sans-serif; }
.card { background: rgba(255,255,255,0.10); border-radius: 18px; padding: 2rem; margin: 2rem auto; max-width: 650px; }
h1 { text-align: center; }
.fields { display: grid; grid-template-columns: 1fr 1fr; gap: 0.8rem 1.2rem; }
label { display: block; font-weight: 600; }
input { width: 100%; }
button { margin-top: 1.2rem; background: #0d47a1; color: #fff; border: none; border-radius: 10px; padding: 0.6rem 1.4rem; font-size: 1.1rem; }
.verdict { text-align: center; margin-top: 1.2rem; }
.meter-wrap { display: flex; justify-content: center; margin-top: 1.5rem; }
.circle { position: relative; width: 160px; height: 160px; border-radius: 50%; display: flex; align-items: center; justify-content: center; }
.circle span { font-size: 1.8rem; font-weight: bold; }
.error { text-align: center; color: #ffcdd2; margin-top: 1.2rem; }
"#;

/// Render the full page for a form.
///
/// `submission` echoes previously entered values back into the inputs.
pub fn page(form: FormKind, submission: &FormSubmission, outcome: Outcome<'_>) -> String {
    let mut html = String::with_capacity(4096);
    let title = escape(form.title());

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <div class=\"card\">\n<h1>{title}</h1>\n<p style=\"text-align:center\">{tagline}</p>\n\
         <form method=\"post\" action=\"/predict\">\n<div class=\"fields\">\n",
        tagline = escape(form.tagline()),
    );

    for field in form.fields() {
        html.push_str(&input(field, submission.value(field.key)));
    }

    html.push_str("</div>\n<button type=\"submit\">Predict</button>\n</form>\n");

    match outcome {
        Outcome::Empty => {}
        Outcome::Verdict(verdict) => html.push_str(&verdict_block(verdict)),
        Outcome::Invalid(message) => {
            let _ = writeln!(html, "<p class=\"error\">{}</p>", escape(message));
        }
        Outcome::Failure => {
            html.push_str("<p class=\"error\">Prediction failed. Please try again later.</p>\n");
        }
    }

    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn input(field: &NumericField, value: Option<&str>) -> String {
    let mut attrs = format!(
        "type=\"number\" id=\"{key}\" name=\"{key}\" min=\"{min}\" step=\"{step}\"",
        key = field.key,
        min = field.min,
        step = field.html_step(),
    );
    if let Some(max) = field.max {
        let _ = write!(attrs, " max=\"{}\"", max);
    }
    if let Some(value) = value {
        let _ = write!(attrs, " value=\"{}\"", escape(value));
    }

    format!(
        "<div><label for=\"{}\">{}</label><input {}></div>\n",
        field.key,
        escape(field.label),
        attrs
    )
}

/// Verdict line plus circular percentage meter
pub fn verdict_block(verdict: &Verdict) -> String {
    let color = verdict.color();
    let pct = verdict.percentage;
    format!(
        "<div class=\"verdict\" data-label=\"{label}\">\n\
         <h2 style=\"color:{color}\">{text}</h2>\n</div>\n\
         <div class=\"meter-wrap\">\n\
         <div class=\"circle\" style=\"background: conic-gradient({color} {pct}%, rgba(255,255,255,0.15) 0%);\">\
         <span>{pct}%</span></div>\n</div>\n",
        label = verdict.label,
        text = escape(verdict.text),
    )
}

/// Minimal HTML escaping for text and attribute values
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::prediction::Label;
    use crate::types::verdict::Tone;

    #[test]
    fn test_empty_page_has_every_field_and_no_verdict() {
        let html = page(FormKind::Diabetes, &FormSubmission::new(), Outcome::Empty);

        for field in FormKind::Diabetes.fields() {
            assert!(html.contains(&format!("name=\"{}\"", field.key)));
        }
        assert!(html.contains(">Predict</button>"));
        assert!(!html.contains("class=\"verdict\""));
        assert!(!html.contains("meter-wrap\">"));
    }

    #[test]
    fn test_placement_inputs_carry_bounds() {
        let html = page(FormKind::Placement, &FormSubmission::new(), Outcome::Empty);
        assert!(html.contains("name=\"cgpa\" min=\"0\" step=\"0.01\" max=\"10\""));
        assert!(html.contains("name=\"iq\" min=\"0\" step=\"1\" max=\"200\""));
    }

    #[test]
    fn test_verdict_block() {
        let verdict = Verdict {
            label: Label::Positive,
            text: "High Risk: Likely Diabetic",
            tone: Tone::Alert,
            percentage: 83,
        };
        let html = verdict_block(&verdict);

        assert!(html.contains("High Risk: Likely Diabetic"));
        assert!(html.contains("color:#ef5350"));
        assert!(html.contains("<span>83%</span>"));
        assert!(html.contains("data-label=\"1\""));
    }

    #[test]
    fn test_submitted_values_are_escaped() {
        let submission = FormSubmission::new().with_value("cgpa", "\"><script>");
        let html = page(
            FormKind::Placement,
            &submission,
            Outcome::Invalid("CGPA must be a number, got \"\\\"><script>\""),
        );

        assert!(!html.contains("<script>"));
        assert!(html.contains("value=\"&quot;&gt;&lt;script&gt;\""));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a & b < c"), "a &amp; b &lt; c");
        assert_eq!(escape("plain"), "plain");
    }
}
