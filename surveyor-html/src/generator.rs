//! HTML form generator implementation.

use surveyor::{NpsScale, Question, QuestionType, Section, Survey};

/// How a survey preview is rendered.
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Page title. The survey title is used when unset.
    pub title: Option<String>,
    /// Embed the built-in stylesheet.
    pub include_styles: bool,
    /// Wrap the form in a standalone page. When false only the `<form>` is
    /// produced.
    pub full_document: bool,
    /// Prepended to every generated class name.
    pub class_prefix: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            title: None,
            include_styles: true,
            full_document: true,
            class_prefix: "survey".to_string(),
        }
    }
}

impl HtmlOptions {
    /// A standalone, styled page using the `survey` class prefix.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_styles(mut self, include: bool) -> Self {
        self.include_styles = include;
        self
    }

    pub fn full_document(mut self, full: bool) -> Self {
        self.full_document = full;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }
}

/// Render a survey as an HTML form.
///
/// Sections become fieldsets in order. Disabled questions and options are
/// left out. Every field is named after its question id, so a submitted form
/// maps straight onto answers.
pub fn to_html(survey: &Survey, options: &HtmlOptions) -> String {
    let mut html = String::new();
    let prefix = &options.class_prefix;
    let title = options.title.as_deref().unwrap_or(&survey.title);

    if options.full_document {
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("  <meta charset=\"UTF-8\">\n");
        html.push_str(
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );

        if !title.is_empty() {
            html.push_str(&format!("  <title>{}</title>\n", escape_html(title)));
        }

        if options.include_styles {
            html.push_str(&generate_styles(prefix));
        }

        html.push_str("</head>\n<body>\n");
    }

    html.push_str(&format!("<form class=\"{prefix}-form\">\n"));

    if !title.is_empty() {
        html.push_str(&format!(
            "  <h1 class=\"{prefix}-title\">{}</h1>\n",
            escape_html(title)
        ));
    }

    if !survey.description.trim().is_empty() {
        html.push_str(&format!(
            "  <div class=\"{prefix}-description\">{}</div>\n",
            escape_html(&survey.description)
        ));
    }

    for section in survey.sections() {
        html.push_str(&generate_section(section, prefix));
    }

    html.push_str(&format!(
        "  <button type=\"submit\" class=\"{prefix}-submit\">Submit</button>\n"
    ));

    html.push_str("</form>\n");

    if options.full_document {
        html.push_str("</body>\n</html>\n");
    }

    html
}

fn generate_section(section: &Section, prefix: &str) -> String {
    let mut html = String::new();

    html.push_str(&format!(
        "  <fieldset class=\"{prefix}-fieldset {prefix}-section\" id=\"section-{}\">\n",
        section.id
    ));
    html.push_str(&format!(
        "    <legend>{}</legend>\n",
        escape_html(&section.title)
    ));
    if !section.description.trim().is_empty() {
        html.push_str(&format!(
            "    <p class=\"{prefix}-section-description\">{}</p>\n",
            escape_html(&section.description)
        ));
    }

    for question in section.questions().iter().filter(|q| !q.disabled) {
        html.push_str(&generate_question(question, prefix, 2));
    }

    html.push_str("  </fieldset>\n");
    html
}

/// Generate HTML for a single question.
fn generate_question(question: &Question, prefix: &str, indent: usize) -> String {
    let ind = "  ".repeat(indent);
    let field_id = format!("q-{}", question.id);
    let name = question.id.to_string();
    let required = if question.required { " required" } else { "" };
    let placeholder = question
        .placeholder
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(|p| format!(" placeholder=\"{}\"", escape_html(p)))
        .unwrap_or_default();
    let described_by = if has_help(question) {
        format!(" aria-describedby=\"{field_id}-help\"")
    } else {
        String::new()
    };
    let label = format_label(question, prefix);

    let mut html = String::new();

    match question.kind {
        QuestionType::ShortText
        | QuestionType::Email
        | QuestionType::Phone
        | QuestionType::Url
        | QuestionType::Date
        | QuestionType::Time => {
            let input_type = match question.kind {
                QuestionType::Email => "email",
                QuestionType::Phone => "tel",
                QuestionType::Url => "url",
                QuestionType::Date => "date",
                QuestionType::Time => "time",
                _ => "text",
            };

            html.push_str(&format!("{ind}<div class=\"{prefix}-field\">\n"));
            html.push_str(&format!("{ind}  <label for=\"{field_id}\">{label}</label>\n"));
            html.push_str(&format!(
                "{ind}  <input type=\"{input_type}\" id=\"{field_id}\" name=\"{name}\" class=\"{prefix}-input\"{placeholder}{described_by}{required}>\n"
            ));
            html.push_str(&generate_help(question, &field_id, prefix, &ind));
            html.push_str(&format!("{ind}</div>\n"));
        }

        QuestionType::LongText => {
            html.push_str(&format!("{ind}<div class=\"{prefix}-field\">\n"));
            html.push_str(&format!("{ind}  <label for=\"{field_id}\">{label}</label>\n"));
            html.push_str(&format!(
                "{ind}  <textarea id=\"{field_id}\" name=\"{name}\" rows=\"4\" class=\"{prefix}-textarea\"{placeholder}{described_by}{required}></textarea>\n"
            ));
            html.push_str(&generate_help(question, &field_id, prefix, &ind));
            html.push_str(&format!("{ind}</div>\n"));
        }

        QuestionType::Number => {
            let mut attrs = format!(
                "type=\"number\" step=\"{}\" id=\"{field_id}\" name=\"{name}\" class=\"{prefix}-input\"",
                question
                    .settings
                    .step
                    .map_or_else(|| "any".to_string(), |step| step.to_string())
            );
            push_bounds(&mut attrs, question.settings.min_range, question.settings.max_range);

            html.push_str(&format!("{ind}<div class=\"{prefix}-field\">\n"));
            html.push_str(&format!("{ind}  <label for=\"{field_id}\">{label}</label>\n"));
            html.push_str(&format!(
                "{ind}  <input {attrs}{placeholder}{described_by}{required}>\n"
            ));
            html.push_str(&generate_help(question, &field_id, prefix, &ind));
            html.push_str(&format!("{ind}</div>\n"));
        }

        QuestionType::Rating | QuestionType::NetPromoterScore => {
            let max = match question.settings.net_promoter_score_scale {
                Some(scale) => Some(f64::from(scale.max())),
                None if question.kind == QuestionType::NetPromoterScore => {
                    Some(f64::from(NpsScale::Ten.max()))
                }
                None => question.settings.max_range,
            };
            let mut attrs = format!(
                "type=\"range\" step=\"{}\" id=\"{field_id}\" name=\"{name}\" class=\"{prefix}-range\"",
                question.settings.step.unwrap_or(1.0)
            );
            push_bounds(&mut attrs, question.settings.min_range, max);

            html.push_str(&format!(
                "{ind}<div class=\"{prefix}-field {prefix}-scale\">\n"
            ));
            html.push_str(&format!("{ind}  <label for=\"{field_id}\">{label}</label>\n"));
            html.push_str(&format!("{ind}  <input {attrs}{described_by}{required}>\n"));
            html.push_str(&generate_help(question, &field_id, prefix, &ind));
            html.push_str(&format!("{ind}</div>\n"));
        }

        QuestionType::MultipleChoice | QuestionType::LikertScale | QuestionType::Checkbox => {
            let (input_type, group, field_name) = if question.kind == QuestionType::Checkbox {
                ("checkbox", "anyof", format!("{name}[]"))
            } else {
                ("radio", "oneof", name.clone())
            };

            html.push_str(&format!(
                "{ind}<fieldset class=\"{prefix}-fieldset {prefix}-{group}\"{described_by}>\n"
            ));
            html.push_str(&format!("{ind}  <legend>{label}</legend>\n"));

            for option in question.options.iter().filter(|o| !o.disabled) {
                let option_id = format!("{field_id}-{}", option.order);
                // Browsers only enforce `required` per radio group.
                let option_required = if input_type == "radio" { required } else { "" };
                html.push_str(&format!(
                    "{ind}  <div class=\"{prefix}-{input_type}-option\">\n"
                ));
                html.push_str(&format!(
                    "{ind}    <input type=\"{input_type}\" id=\"{option_id}\" name=\"{field_name}\" value=\"{}\"{option_required}>\n",
                    escape_html(&option.value)
                ));
                html.push_str(&format!(
                    "{ind}    <label for=\"{option_id}\">{}</label>\n",
                    escape_html(&option.text)
                ));
                html.push_str(&format!("{ind}  </div>\n"));
            }

            html.push_str(&generate_help(question, &field_id, prefix, &ind));
            html.push_str(&format!("{ind}</fieldset>\n"));
        }

        QuestionType::Dropdown => {
            html.push_str(&format!("{ind}<div class=\"{prefix}-field\">\n"));
            html.push_str(&format!("{ind}  <label for=\"{field_id}\">{label}</label>\n"));
            html.push_str(&format!(
                "{ind}  <select id=\"{field_id}\" name=\"{name}\" class=\"{prefix}-select\"{described_by}{required}>\n"
            ));
            let prompt = question.placeholder.as_deref().unwrap_or("Select an option");
            html.push_str(&format!(
                "{ind}    <option value=\"\">{}</option>\n",
                escape_html(prompt)
            ));
            for option in question.options.iter().filter(|o| !o.disabled) {
                html.push_str(&format!(
                    "{ind}    <option value=\"{}\">{}</option>\n",
                    escape_html(&option.value),
                    escape_html(&option.text)
                ));
            }
            html.push_str(&format!("{ind}  </select>\n"));
            html.push_str(&generate_help(question, &field_id, prefix, &ind));
            html.push_str(&format!("{ind}</div>\n"));
        }

        QuestionType::YesNo => {
            html.push_str(&format!(
                "{ind}<fieldset class=\"{prefix}-fieldset {prefix}-oneof\"{described_by}>\n"
            ));
            html.push_str(&format!("{ind}  <legend>{label}</legend>\n"));
            for (value, text) in [("true", "Yes"), ("false", "No")] {
                let option_id = format!("{field_id}-{value}");
                html.push_str(&format!("{ind}  <div class=\"{prefix}-radio-option\">\n"));
                html.push_str(&format!(
                    "{ind}    <input type=\"radio\" id=\"{option_id}\" name=\"{name}\" value=\"{value}\"{required}>\n"
                ));
                html.push_str(&format!(
                    "{ind}    <label for=\"{option_id}\">{text}</label>\n"
                ));
                html.push_str(&format!("{ind}  </div>\n"));
            }
            html.push_str(&generate_help(question, &field_id, prefix, &ind));
            html.push_str(&format!("{ind}</fieldset>\n"));
        }

        QuestionType::FileUpload => {
            let accept = if question.settings.file_types_allowed.is_empty() {
                String::new()
            } else {
                format!(
                    " accept=\"{}\"",
                    escape_html(&question.settings.file_types_allowed.join(","))
                )
            };

            html.push_str(&format!("{ind}<div class=\"{prefix}-field\">\n"));
            html.push_str(&format!("{ind}  <label for=\"{field_id}\">{label}</label>\n"));
            html.push_str(&format!(
                "{ind}  <input type=\"file\" id=\"{field_id}\" name=\"{name}\" class=\"{prefix}-file\"{accept}{described_by}{required}>\n"
            ));
            if let Some(bytes) = question.settings.max_file_size {
                html.push_str(&format!(
                    "{ind}  <p class=\"{prefix}-hint\">Maximum file size: {}</p>\n",
                    format_size(bytes)
                ));
            }
            html.push_str(&generate_help(question, &field_id, prefix, &ind));
            html.push_str(&format!("{ind}</div>\n"));
        }

        QuestionType::Signature => {
            html.push_str(&format!(
                "{ind}<div class=\"{prefix}-field {prefix}-signature\">\n"
            ));
            html.push_str(&format!("{ind}  <label for=\"{field_id}\">{label}</label>\n"));
            html.push_str(&format!(
                "{ind}  <input type=\"text\" id=\"{field_id}\" name=\"{name}\" class=\"{prefix}-input {prefix}-signature-line\" placeholder=\"Type your full name\"{described_by}{required}>\n"
            ));
            html.push_str(&generate_help(question, &field_id, prefix, &ind));
            html.push_str(&format!("{ind}</div>\n"));
        }

        QuestionType::Legal => {
            html.push_str(&format!(
                "{ind}<div class=\"{prefix}-field {prefix}-legal\">\n"
            ));
            html.push_str(&format!("{ind}  <p class=\"{prefix}-legal-title\">{label}</p>\n"));
            if let Some(text) = question
                .settings
                .legal_agreement_text
                .as_deref()
                .filter(|t| !t.trim().is_empty())
            {
                html.push_str(&format!(
                    "{ind}  <div class=\"{prefix}-legal-text\">{}</div>\n",
                    escape_html(text)
                ));
            }
            html.push_str(&format!("{ind}  <div class=\"{prefix}-checkbox\">\n"));
            html.push_str(&format!(
                "{ind}    <input type=\"checkbox\" id=\"{field_id}\" name=\"{name}\" value=\"true\"{described_by}{required}>\n"
            ));
            html.push_str(&format!(
                "{ind}    <label for=\"{field_id}\">I have read and agree to the terms above</label>\n"
            ));
            html.push_str(&format!("{ind}  </div>\n"));
            html.push_str(&generate_help(question, &field_id, prefix, &ind));
            html.push_str(&format!("{ind}</div>\n"));
        }
    }

    html
}

fn has_help(question: &Question) -> bool {
    question
        .help_text
        .as_deref()
        .is_some_and(|help| !help.trim().is_empty())
}

fn generate_help(question: &Question, field_id: &str, prefix: &str, ind: &str) -> String {
    match question.help_text.as_deref() {
        Some(help) if !help.trim().is_empty() => format!(
            "{ind}  <p class=\"{prefix}-help\" id=\"{field_id}-help\">{}</p>\n",
            escape_html(help)
        ),
        _ => String::new(),
    }
}

fn push_bounds(attrs: &mut String, min: Option<f64>, max: Option<f64>) {
    if let Some(min) = min {
        attrs.push_str(&format!(" min=\"{min}\""));
    }
    if let Some(max) = max {
        attrs.push_str(&format!(" max=\"{max}\""));
    }
}

/// Format a question prompt as an escaped label, with a marker when required.
fn format_label(question: &Question, prefix: &str) -> String {
    let text = if question.text.trim().is_empty() {
        "Untitled question"
    } else {
        question.text.as_str()
    };
    let mut label = escape_html(text);
    if question.required {
        label.push_str(&format!(
            " <span class=\"{prefix}-required\" aria-hidden=\"true\">*</span>"
        ));
    }
    label
}

fn format_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{} MB", bytes / MIB)
    } else if bytes >= 1024 && bytes % 1024 == 0 {
        format!("{} KB", bytes / 1024)
    } else {
        format!("{bytes} bytes")
    }
}

/// Escape text for use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// The built-in stylesheet. Only classes the generator emits are styled.
fn generate_styles(prefix: &str) -> String {
    format!(
        r#"  <style>
    .{prefix}-form {{ max-width: 42rem; margin: 0 auto; padding: 1.5rem; font: 16px/1.5 system-ui, sans-serif; }}
    .{prefix}-title {{ margin-bottom: 0.5rem; }}
    .{prefix}-description {{ color: #444; white-space: pre-wrap; }}
    .{prefix}-section {{ border: 1px solid #d0d7de; border-radius: 6px; margin: 1.5rem 0; padding: 1rem 1.25rem; }}
    .{prefix}-section > legend {{ font-weight: 600; font-size: 1.15rem; }}
    .{prefix}-section-description, .{prefix}-help, .{prefix}-hint {{ color: #57606a; font-size: 0.875rem; margin: 0.25rem 0; }}
    .{prefix}-field {{ margin: 1rem 0; }}
    .{prefix}-field > label {{ display: block; font-weight: 500; }}
    .{prefix}-required {{ color: #cf222e; }}
    .{prefix}-input, .{prefix}-textarea, .{prefix}-select {{ width: 100%; padding: 0.4rem 0.6rem; border: 1px solid #d0d7de; border-radius: 4px; box-sizing: border-box; }}
    .{prefix}-scale .{prefix}-range {{ width: 100%; }}
    .{prefix}-oneof, .{prefix}-anyof {{ border: none; padding: 0; margin: 1rem 0; }}
    .{prefix}-radio-option, .{prefix}-checkbox-option {{ padding: 0.15rem 0; }}
    .{prefix}-signature-line {{ border: none; border-bottom: 1px solid #24292f; border-radius: 0; font-style: italic; }}
    .{prefix}-legal-title {{ font-weight: 600; }}
    .{prefix}-legal-text {{ max-height: 12rem; overflow-y: auto; padding: 0.75rem; background: #f6f8fa; white-space: pre-wrap; }}
    .{prefix}-checkbox {{ display: flex; gap: 0.5rem; align-items: baseline; }}
    .{prefix}-submit {{ padding: 0.6rem 1.5rem; border: none; border-radius: 6px; background: #1f883d; color: #fff; cursor: pointer; }}
  </style>
"#
    )
}
