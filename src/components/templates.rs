use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use log::{debug, info, warn};

use crate::errors::WikiError;
use crate::types::Page;
use crate::utils::escape_html;

/// Template names, the files they are loaded from, and their built-in copies
pub const TEMPLATE_FILES: [(&str, &str, &str); 2] = [
    ("edit", "edit.html", include_str!("../../templates/edit.html")),
    ("view", "view.html", include_str!("../../templates/view.html")),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(Field),
}

/// A parsed template: literal text interleaved with `{{TITLE}}` / `{{BODY}}`
#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template source, rejecting unknown or unterminated placeholders
    pub fn parse(name: &str, source: &str) -> Result<Self, WikiError> {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| {
                WikiError::Template(format!("{}: unterminated placeholder", name))
            })?;
            let field = match after[..end].trim() {
                "TITLE" => Field::Title,
                "BODY" => Field::Body,
                other => {
                    return Err(WikiError::Template(format!(
                        "{}: unknown placeholder '{{{{{}}}}}'",
                        name, other
                    )));
                }
            };
            segments.push(Segment::Field(field));
            rest = &after[end + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self { segments })
    }

    fn render(&self, title: &str, body: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(Field::Title) => out.push_str(&escape_html(title)),
                Segment::Field(Field::Body) => out.push_str(&escape_html(body)),
            }
        }
        out
    }
}

/// The page templates, parsed once at startup and shared read-only
#[derive(Debug, Clone)]
pub struct TemplateSet {
    templates: HashMap<String, Template>,
}

impl TemplateSet {
    /// Load `edit.html` and `view.html` from `dir`.
    ///
    /// A missing file falls back to the copy built into the binary; a file
    /// that exists but fails to read or parse is an error.
    pub fn load(dir: &Path) -> Result<Self, WikiError> {
        let mut templates = HashMap::new();

        for (name, file, builtin) in TEMPLATE_FILES {
            let path = dir.join(file);
            let source = match fs::read_to_string(&path) {
                Ok(source) => {
                    info!("Loaded template '{}' from {:?}", name, path);
                    source
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    warn!("Template {:?} not found, using built-in '{}'", path, name);
                    builtin.to_string()
                }
                Err(e) => return Err(WikiError::Io(e)),
            };
            templates.insert(name.to_string(), Template::parse(file, &source)?);
        }

        Ok(Self { templates })
    }

    /// The templates compiled into the binary
    pub fn builtin() -> Result<Self, WikiError> {
        let mut templates = HashMap::new();
        for (name, file, builtin) in TEMPLATE_FILES {
            templates.insert(name.to_string(), Template::parse(file, builtin)?);
        }
        Ok(Self { templates })
    }

    /// Render template `name` with the page's title and body
    pub fn render(&self, name: &str, page: &Page) -> Result<String, WikiError> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| WikiError::Template(format!("no template named \"{}.html\"", name)))?;
        let body = std::str::from_utf8(&page.body).map_err(|e| {
            WikiError::Template(format!("body of '{}' is not valid UTF-8: {}", page.title, e))
        })?;

        debug!("Rendering '{}' for page '{}'", name, page.title);
        Ok(template.render(&page.title, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_text_and_fields() {
        let template = Template::parse("t", "<h1>{{TITLE}}</h1>{{ BODY }}!").unwrap();
        assert_eq!(
            template.segments,
            vec![
                Segment::Text("<h1>".to_string()),
                Segment::Field(Field::Title),
                Segment::Text("</h1>".to_string()),
                Segment::Field(Field::Body),
                Segment::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn parse_rejects_unknown_placeholder() {
        let err = Template::parse("view.html", "{{AUTHOR}}").unwrap_err();
        assert_eq!(err.to_string(), "Template error: view.html: unknown placeholder '{{AUTHOR}}'");
    }

    #[test]
    fn parse_rejects_unterminated_placeholder() {
        assert!(Template::parse("edit.html", "<p>{{TITLE</p>").is_err());
    }

    #[test]
    fn render_escapes_fields() {
        let set = TemplateSet::builtin().unwrap();
        let page = Page::new("Test", "<script>alert('x')</script> & more");

        let html = set.render("view", &page).unwrap();

        assert!(html.contains("Test"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; more"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn edit_form_posts_to_save() {
        let set = TemplateSet::builtin().unwrap();
        let html = set.render("edit", &Page::empty("NewPage")).unwrap();

        assert!(html.contains("action=\"/save/NewPage\""));
        assert!(html.contains("name=\"body\""));
    }

    #[test]
    fn builtin_templates_are_distinct() {
        let set = TemplateSet::builtin().unwrap();
        let page = Page::new("Same", "text");

        assert!(set.render("edit", &page).unwrap().contains("<textarea"));
        assert!(!set.render("view", &page).unwrap().contains("<textarea"));
    }

    #[test]
    fn render_unknown_template_fails() {
        let set = TemplateSet::builtin().unwrap();
        assert!(matches!(set.render("list", &Page::empty("x")), Err(WikiError::Template(_))));
    }

    #[test]
    fn render_non_utf8_body_fails() {
        let set = TemplateSet::builtin().unwrap();
        let page = Page::new("Bytes", vec![0xff, 0xfe]);
        assert!(matches!(set.render("view", &page), Err(WikiError::Template(_))));
    }

    #[test]
    fn load_prefers_files_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("view.html"), "VIEW {{TITLE}}: {{BODY}}").unwrap();

        let set = TemplateSet::load(dir.path()).unwrap();

        assert_eq!(set.render("view", &Page::new("A", "b")).unwrap(), "VIEW A: b");
        // edit.html is absent, so the built-in form is used
        assert!(set.render("edit", &Page::empty("A")).unwrap().contains("<form"));
    }

    #[test]
    fn load_fails_on_broken_template() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("edit.html"), "{{NOPE}}").unwrap();

        assert!(matches!(TemplateSet::load(dir.path()), Err(WikiError::Template(_))));
    }
}
