//! Deterministic prompt templating.
//!
//! Templates use a small Handlebars-style subset, matching the prompt
//! syntax the Ignitia flows were written in:
//!
//! - `{{field}}` / `{{{field}}}` - substitute a field's value
//! - `{{#each list}}...{{/each}}` - render the body once per element, in
//!   order, with the element's fields (or `{{this}}` for scalar lists)
//!   bound inside the body
//! - `{{#if field}}...{{else}}...{{/if}}` - branch on an optional field
//!   being present (absent or `null` takes the `{{else}}` branch)
//!
//! A template is compiled to a segment tree once, at flow definition time;
//! compilation is the only fallible step. [`PromptTemplate::render`] is
//! total for validated input and byte-deterministic: identical input yields
//! identical text.

use crate::error::TemplateError;
use serde_json::Value;

/// A compiled prompt template.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Placeholder(String),
    Each {
        field: String,
        body: Vec<Segment>,
    },
    If {
        field: String,
        then_body: Vec<Segment>,
        else_body: Vec<Segment>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Text(String),
    Tag(String),
}

/// How a segment-list parse ended.
enum Terminator {
    End,
    CloseEach,
    CloseIf,
    Else,
}

impl PromptTemplate {
    /// Compile a template from its source text.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let tokens = tokenize(source)?;
        let mut pos = 0;
        let (segments, terminator) = parse_segments(&tokens, &mut pos)?;
        match terminator {
            Terminator::End => Ok(Self { segments }),
            Terminator::CloseEach => Err(TemplateError::UnexpectedClose("each".to_string())),
            Terminator::CloseIf => Err(TemplateError::UnexpectedClose("if".to_string())),
            Terminator::Else => Err(TemplateError::MisplacedElse),
        }
    }

    /// Render the template against a validated input value.
    ///
    /// Never fails: a placeholder that does not resolve is a programming
    /// error in the template (input is validated before rendering), so it
    /// renders as an empty string and logs a warning rather than erroring.
    pub fn render(&self, input: &Value) -> String {
        let mut out = String::new();
        render_segments(&self.segments, &mut vec![input], &mut out);
        out
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut offset = 0;

    while let Some(start) = rest.find("{{") {
        if start > 0 {
            tokens.push(Token::Text(rest[..start].to_string()));
        }
        let after_open = &rest[start..];
        // Triple-stache `{{{name}}}` renders identically to `{{name}}`:
        // prompts are plain text, there is no escaping to suppress.
        let (open_len, close) = if after_open.starts_with("{{{") {
            (3, "}}}")
        } else {
            (2, "}}")
        };
        let body_start = start + open_len;
        let Some(close_at) = rest[body_start..].find(close) else {
            return Err(TemplateError::UnclosedPlaceholder(offset + start));
        };
        let inner = rest[body_start..body_start + close_at].trim();
        if inner.is_empty() {
            return Err(TemplateError::MalformedTag("{{}}".to_string()));
        }
        tokens.push(Token::Tag(inner.to_string()));
        let consumed = body_start + close_at + close.len();
        offset += consumed;
        rest = &rest[consumed..];
    }
    if !rest.is_empty() {
        tokens.push(Token::Text(rest.to_string()));
    }
    Ok(tokens)
}

fn parse_segments(
    tokens: &[Token],
    pos: &mut usize,
) -> Result<(Vec<Segment>, Terminator), TemplateError> {
    let mut segments = Vec::new();

    while *pos < tokens.len() {
        let token = &tokens[*pos];
        *pos += 1;
        match token {
            Token::Text(text) => segments.push(Segment::Literal(text.clone())),
            Token::Tag(tag) => {
                if let Some(field) = tag.strip_prefix("#each") {
                    let field = parse_field_name(tag, field)?;
                    let (body, terminator) = parse_segments(tokens, pos)?;
                    match terminator {
                        Terminator::CloseEach => segments.push(Segment::Each { field, body }),
                        _ => return Err(TemplateError::UnclosedBlock("each".to_string())),
                    }
                } else if let Some(field) = tag.strip_prefix("#if") {
                    let field = parse_field_name(tag, field)?;
                    let (then_body, terminator) = parse_segments(tokens, pos)?;
                    let else_body = match terminator {
                        Terminator::CloseIf => Vec::new(),
                        Terminator::Else => {
                            let (body, terminator) = parse_segments(tokens, pos)?;
                            match terminator {
                                Terminator::CloseIf => body,
                                _ => return Err(TemplateError::UnclosedBlock("if".to_string())),
                            }
                        }
                        _ => return Err(TemplateError::UnclosedBlock("if".to_string())),
                    };
                    segments.push(Segment::If {
                        field,
                        then_body,
                        else_body,
                    });
                } else if tag == "/each" {
                    return Ok((segments, Terminator::CloseEach));
                } else if tag == "/if" {
                    return Ok((segments, Terminator::CloseIf));
                } else if tag == "else" {
                    return Ok((segments, Terminator::Else));
                } else if tag.starts_with('#') || tag.starts_with('/') {
                    return Err(TemplateError::MalformedTag(tag.clone()));
                } else {
                    segments.push(Segment::Placeholder(tag.clone()));
                }
            }
        }
    }

    Ok((segments, Terminator::End))
}

fn parse_field_name(tag: &str, rest: &str) -> Result<String, TemplateError> {
    let field = rest.trim();
    if field.is_empty() || field.contains(char::is_whitespace) {
        return Err(TemplateError::MalformedTag(tag.to_string()));
    }
    Ok(field.to_string())
}

fn render_segments<'a>(segments: &[Segment], scopes: &mut Vec<&'a Value>, out: &mut String) {
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(name) => match resolve(scopes, name) {
                Some(value) => push_value(value, out),
                None => {
                    log::warn!("template placeholder `{name}` did not resolve; rendering empty");
                }
            },
            Segment::Each { field, body } => {
                let elements = resolve(scopes, field).and_then(Value::as_array);
                let Some(elements) = elements else {
                    log::warn!("template block `#each {field}` did not resolve to a list");
                    continue;
                };
                for element in elements {
                    scopes.push(element);
                    render_segments(body, scopes, out);
                    scopes.pop();
                }
            }
            Segment::If {
                field,
                then_body,
                else_body,
            } => {
                let present = resolve(scopes, field).is_some_and(|v| !v.is_null());
                let body = if present { then_body } else { else_body };
                render_segments(body, scopes, out);
            }
        }
    }
}

/// Resolve a placeholder name against the scope stack, innermost first.
///
/// `this` names the current `#each` element itself.
fn resolve<'a>(scopes: &[&'a Value], name: &str) -> Option<&'a Value> {
    if name == "this" {
        return scopes.last().copied();
    }
    scopes
        .iter()
        .rev()
        .find_map(|scope| scope.as_object().and_then(|obj| obj.get(name)))
}

fn push_value(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Null => {}
        // Composite values in scalar position; serialize compactly.
        other => out.push_str(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_plain_substitution() {
        let template = PromptTemplate::parse("Test Name: {{testName}}").unwrap();
        let out = template.render(&json!({ "testName": "JavaScript Fundamentals" }));
        assert_eq!(out, "Test Name: JavaScript Fundamentals");
    }

    #[test]
    fn test_triple_stache_renders_like_double() {
        let template = PromptTemplate::parse("{{{name}}} and {{name}}").unwrap();
        let out = template.render(&json!({ "name": "closures" }));
        assert_eq!(out, "closures and closures");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let template = PromptTemplate::parse(
            "{{#each responses}}Q: {{question}} A: {{answer}}\n{{/each}}",
        )
        .unwrap();
        let input = json!({
            "responses": [
                { "question": "A?", "answer": "1" },
                { "question": "B?", "answer": "2" },
            ]
        });
        assert_eq!(template.render(&input), template.render(&input));
    }

    #[test]
    fn test_each_preserves_element_order() {
        let template =
            PromptTemplate::parse("{{#each responses}}{{question}} {{answer}} {{/each}}").unwrap();
        let input = json!({
            "responses": [
                { "question": "A?", "answer": "1" },
                { "question": "B?", "answer": "2" },
            ]
        });
        let out = template.render(&input);
        let a = out.find("A?").unwrap();
        let b = out.find("B?").unwrap();
        let one = out.find('1').unwrap();
        let two = out.find('2').unwrap();
        assert!(a < b);
        assert!(one < two);
    }

    #[test]
    fn test_each_over_scalar_list_with_this() {
        let template = PromptTemplate::parse("{{#each steps}}- {{this}}\n{{/each}}").unwrap();
        let out = template.render(&json!({ "steps": ["clone", "build"] }));
        assert_eq!(out, "- clone\n- build\n");
    }

    #[test]
    fn test_if_present_renders_value() {
        let template = PromptTemplate::parse(
            "Style: {{#if preferredLearningStyle}}{{preferredLearningStyle}}{{else}}No specific preference{{/if}}",
        )
        .unwrap();
        let out = template.render(&json!({ "preferredLearningStyle": "visual" }));
        assert_eq!(out, "Style: visual");
    }

    #[rstest]
    #[case::absent(json!({}))]
    #[case::null(json!({ "preferredLearningStyle": null }))]
    fn test_if_absent_renders_fallback(#[case] input: Value) {
        let template = PromptTemplate::parse(
            "Style: {{#if preferredLearningStyle}}{{preferredLearningStyle}}{{else}}No specific preference{{/if}}",
        )
        .unwrap();
        assert_eq!(template.render(&input), "Style: No specific preference");
    }

    #[test]
    fn test_if_without_else() {
        let template = PromptTemplate::parse("{{#if note}}Note: {{note}}{{/if}}done").unwrap();
        assert_eq!(template.render(&json!({})), "done");
        assert_eq!(
            template.render(&json!({ "note": "hi" })),
            "Note: hidone"
        );
    }

    #[test]
    fn test_outer_scope_visible_inside_each() {
        let template =
            PromptTemplate::parse("{{#each responses}}{{testName}}: {{answer}};{{/each}}").unwrap();
        let input = json!({
            "testName": "JS",
            "responses": [{ "answer": "1" }, { "answer": "2" }],
        });
        assert_eq!(template.render(&input), "JS: 1;JS: 2;");
    }

    #[test]
    fn test_empty_list_renders_nothing() {
        let template = PromptTemplate::parse("[{{#each xs}}{{this}}{{/each}}]").unwrap();
        assert_eq!(template.render(&json!({ "xs": [] })), "[]");
    }

    #[test]
    fn test_whitespace_in_tags() {
        let template = PromptTemplate::parse("{{ name }} / {{#each  items }}{{this}}{{/each}}");
        let template = template.unwrap();
        let out = template.render(&json!({ "name": "x", "items": ["y"] }));
        assert_eq!(out, "x / y");
    }

    #[rstest]
    #[case::unclosed_placeholder("Hello {{name", TemplateError::UnclosedPlaceholder(6))]
    #[case::unclosed_each("{{#each xs}}{{this}}", TemplateError::UnclosedBlock("each".to_string()))]
    #[case::unclosed_if("{{#if x}}y", TemplateError::UnclosedBlock("if".to_string()))]
    #[case::stray_close("text{{/each}}", TemplateError::UnexpectedClose("each".to_string()))]
    #[case::stray_else("{{else}}", TemplateError::MisplacedElse)]
    #[case::bad_tag("{{#each}}{{/each}}", TemplateError::MalformedTag("#each".to_string()))]
    fn test_parse_errors(#[case] source: &str, #[case] expected: TemplateError) {
        assert_eq!(PromptTemplate::parse(source).unwrap_err(), expected);
    }

    #[test]
    fn test_mismatched_close_is_rejected() {
        assert!(PromptTemplate::parse("{{#each xs}}{{/if}}").is_err());
        assert!(PromptTemplate::parse("{{#if x}}{{/each}}").is_err());
    }
}
