use std::fs;
use std::path::Path;

use log::{debug, info};
use roxmltree::{Document, Node, ParsingOptions};

use crate::errors::{AppError, ConfigError, FormatError, StructureError};
use crate::subtitle_processor::SubtitleEntry;
use crate::time_utils::{self, FrameRate};

// @module: Timeline (fcpxml) reading and writing

// @const: Placeholder text fcpxml templates leave in unset title clips
const TEMPLATE_PLACEHOLDER: &str = "Title";

// @const: Tolerance when sanity-checking the requested frame rate, in fps
const FRAMERATE_TOLERANCE: f64 = 0.005;

/// Read and parse an fcpxml file into subtitle entries
pub fn read_timeline_file<P: AsRef<Path>>(path: P) -> Result<Vec<SubtitleEntry>, AppError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let entries = parse_timeline_string(&content)?;

    debug!("Parsed {} title clips from {:?}", entries.len(), path);

    Ok(entries)
}

/// Parse an fcpxml document into subtitle entries, in spine order.
///
/// Only `title` spine children carry cue data; gaps are skipped. A clip whose
/// text is exactly the template placeholder is a leftover from project setup,
/// not a real cue, and is dropped.
pub fn parse_timeline_string(xml: &str) -> Result<Vec<SubtitleEntry>, AppError> {
    let doc = Document::parse_with_options(
        xml,
        ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        },
    )
    .map_err(|e| FormatError::MalformedXml(e.to_string()))?;
    let spine = find_spine(doc.root_element())?;

    let mut entries = Vec::new();
    for node in spine.children().filter(|n| n.is_element()) {
        if node.tag_name().name() != "title" {
            continue;
        }

        let text = title_text(node)?;
        if text == TEMPLATE_PLACEHOLDER {
            continue;
        }

        let offset = time_utils::timeline_to_seconds(required_attr(node, "title", "offset")?)
            .map_err(AppError::Parse)?;
        let duration =
            time_utils::timeline_to_seconds(required_attr(node, "title", "duration")?)
                .map_err(AppError::Parse)?;

        entries.push(SubtitleEntry::new(
            entries.len() + 1,
            offset,
            offset + duration,
            text,
        ));
    }

    Ok(entries)
}

/// Render subtitle entries as an fcpxml document built around a template.
///
/// The template supplies the frame tick (the `frameDuration` of the format
/// under `resources`)
/// and the prototype `title` clip that every cue clones. The spine's original
/// children are replaced wholesale by the generated gap/title sequence; the
/// rest of the template is re-emitted as parsed.
pub fn render_timeline(
    template_xml: &str,
    entries: &[SubtitleEntry],
    event_name: &str,
    requested_framerate: f64,
) -> Result<String, AppError> {
    let doc = Document::parse_with_options(
        template_xml,
        ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        },
    )
    .map_err(|e| StructureError::MalformedTemplate(e.to_string()))?;
    let root = doc.root_element();

    // The template's tick is authoritative; the requested rate is only a
    // sanity check against quietly misquantizing every clip boundary.
    let resources = child_element(root, "resources")?;
    let format = child_element(resources, "format")?;
    let frame_duration = required_attr(format, "format", "frameDuration")?;
    let rate = FrameRate::from_frame_duration(frame_duration).map_err(AppError::Parse)?;

    let template_fps = rate.fps();
    if (requested_framerate - template_fps).abs() > FRAMERATE_TOLERANCE {
        return Err(ConfigError::FrameRateMismatch {
            template_fps,
            requested_fps: requested_framerate,
        }
        .into());
    }

    let library = child_element(root, "library")?;
    let event = child_element(library, "event")?;
    let project = child_element(event, "project")?;
    let sequence = child_element(project, "sequence")?;
    let spine = child_element(sequence, "spine")?;

    let prototype = TitlePrototype::locate(spine)?;

    let spine_indent = leading_indent(spine);
    let child_indent = format!("{}    ", spine_indent);

    let mut spine_markup = String::new();
    for (i, entry) in entries.iter().enumerate() {
        let counter = i + 1;

        // a leading gap keeps the first clip from implicitly starting at 0s
        if counter == 1 && entry.start_secs > 0.0 {
            render_gap(
                &time_utils::seconds_to_timeline(entry.start_secs, &rate),
                &child_indent,
                &mut spine_markup,
            );
        }

        prototype.render_clone(entry, counter, &rate, &child_indent, &mut spine_markup);
    }

    info!(
        "Rendering {} title clips at {:.2}fps into event '{}'",
        entries.len(),
        template_fps,
        event_name
    );

    let rules = DocumentRules {
        spine,
        event,
        project,
        event_name: event_name.to_string(),
        spine_markup,
        spine_indent,
    };

    let mut body = String::new();
    for node in doc.root().children() {
        emit_node(node, &rules, &mut body);
    }

    let mut output = String::with_capacity(body.len() + 64);
    output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    output.push_str("<!DOCTYPE fcpxml>\n");
    output.push('\n');
    output.push_str(&body);
    if !output.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

/// The template's prototype title clip and the nested nodes every clone
/// must re-point: the styled text run and its style definition.
struct TitlePrototype<'a, 'input> {
    title: Node<'a, 'input>,
    styled_text: Node<'a, 'input>,
    style_def: Node<'a, 'input>,
}

impl<'a, 'input> TitlePrototype<'a, 'input> {
    /// Find the first title clip in the spine and its required inner nodes
    fn locate(spine: Node<'a, 'input>) -> Result<Self, StructureError> {
        let title = child_element(spine, "title")?;
        let text = child_element(title, "text")?;
        let styled_text = text
            .children()
            .find(|n| n.is_element())
            .ok_or(StructureError::MissingElement("text-style"))?;
        let style_def = child_element(title, "text-style-def")?;

        Ok(TitlePrototype {
            title,
            styled_text,
            style_def,
        })
    }

    /// Serialize one independent clone of the prototype for a cue.
    ///
    /// Each clone gets its own `ts{counter}` style id on both the text
    /// reference and the style definition; sharing ids across clips breaks
    /// per-clip styling in the editor.
    fn render_clone(
        &self,
        entry: &SubtitleEntry,
        counter: usize,
        rate: &FrameRate,
        indent: &str,
        out: &mut String,
    ) {
        let offset = time_utils::seconds_to_timeline(entry.start_secs, rate);
        let duration = time_utils::seconds_to_timeline(entry.duration_secs(), rate);
        let style_id = format!("ts{}", counter);

        let rules = CloneRules {
            prototype: self,
            name: format!("{{{}}} {}", counter, entry.text),
            offset,
            duration,
            text: entry.text.clone(),
            style_id,
        };

        out.push_str(indent);
        emit_node(self.title, &rules, out);
        out.push('\n');
    }
}

/// Per-node serialization adjustments applied while re-emitting a tree
trait NodeRules {
    /// Attribute values to substitute (or append) on this element
    fn attr_overrides(&self, node: Node) -> Vec<(&'static str, String)>;

    /// Pre-rendered markup replacing this element's entire content
    fn replace_content(&self, node: Node) -> Option<String>;
}

/// Rules for cloning the prototype title into one cue clip
struct CloneRules<'a, 'b, 'input> {
    prototype: &'a TitlePrototype<'b, 'input>,
    name: String,
    offset: String,
    duration: String,
    text: String,
    style_id: String,
}

impl NodeRules for CloneRules<'_, '_, '_> {
    fn attr_overrides(&self, node: Node) -> Vec<(&'static str, String)> {
        if node == self.prototype.title {
            vec![
                ("name", self.name.clone()),
                ("offset", self.offset.clone()),
                ("duration", self.duration.clone()),
                ("start", self.offset.clone()),
            ]
        } else if node == self.prototype.styled_text {
            vec![("ref", self.style_id.clone())]
        } else if node == self.prototype.style_def {
            vec![("id", self.style_id.clone())]
        } else {
            Vec::new()
        }
    }

    fn replace_content(&self, node: Node) -> Option<String> {
        if node == self.prototype.styled_text {
            Some(escape_text(&self.text))
        } else {
            None
        }
    }
}

/// Rules for re-emitting the template document around the new spine
struct DocumentRules<'a, 'input> {
    spine: Node<'a, 'input>,
    event: Node<'a, 'input>,
    project: Node<'a, 'input>,
    event_name: String,
    spine_markup: String,
    spine_indent: String,
}

impl NodeRules for DocumentRules<'_, '_> {
    fn attr_overrides(&self, node: Node) -> Vec<(&'static str, String)> {
        if node == self.event {
            vec![("name", "CC_XML".to_string())]
        } else if node == self.project {
            vec![("name", self.event_name.clone())]
        } else {
            Vec::new()
        }
    }

    fn replace_content(&self, node: Node) -> Option<String> {
        if node == self.spine {
            Some(format!("\n{}{}", self.spine_markup, self.spine_indent))
        } else {
            None
        }
    }
}

/// Re-emit one node, applying the given rules to it and its descendants
fn emit_node(node: Node, rules: &dyn NodeRules, out: &mut String) {
    if node.is_element() {
        emit_element(node, rules, out);
    } else if node.is_text() {
        if let Some(text) = node.text() {
            out.push_str(&escape_text(text));
        }
    } else if node.is_comment() {
        out.push_str("<!--");
        out.push_str(node.text().unwrap_or(""));
        out.push_str("-->");
    }
}

fn emit_element(node: Node, rules: &dyn NodeRules, out: &mut String) {
    let tag = node.tag_name().name();
    let overrides = rules.attr_overrides(node);

    out.push('<');
    out.push_str(tag);

    for attr in node.attributes() {
        let value = overrides
            .iter()
            .find(|(name, _)| *name == attr.name())
            .map(|(_, value)| value.as_str())
            .unwrap_or_else(|| attr.value());
        out.push(' ');
        out.push_str(attr.name());
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }

    // attributes the template never carried still need to be set
    for (name, value) in &overrides {
        if node.attributes().all(|attr| attr.name() != *name) {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
    }

    if let Some(content) = rules.replace_content(node) {
        out.push('>');
        out.push_str(&content);
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
        return;
    }

    if node.children().next().is_none() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in node.children() {
        emit_node(child, rules, out);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Append a spine-filling gap element covering `[0, duration)`
fn render_gap(duration: &str, indent: &str, out: &mut String) {
    out.push_str(indent);
    out.push_str(&format!(
        "<gap name=\"Gap\" offset=\"0s\" duration=\"{}\" start=\"0s\"/>\n",
        duration
    ));
}

/// Navigate the fixed library path down to the spine
fn find_spine<'a, 'input>(root: Node<'a, 'input>) -> Result<Node<'a, 'input>, StructureError> {
    let library = child_element(root, "library")?;
    let event = child_element(library, "event")?;
    let project = child_element(event, "project")?;
    let sequence = child_element(project, "sequence")?;
    child_element(sequence, "spine")
}

/// First child element with the given tag name
fn child_element<'a, 'input>(
    parent: Node<'a, 'input>,
    tag: &'static str,
) -> Result<Node<'a, 'input>, StructureError> {
    parent
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
        .ok_or(StructureError::MissingElement(tag))
}

/// Attribute that must be present on an element
fn required_attr<'a>(
    node: Node<'a, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str, StructureError> {
    node.attribute(attribute)
        .ok_or(StructureError::MissingAttribute { element, attribute })
}

/// Nested text content of a title clip (first styled run under `text`)
fn title_text(title: Node) -> Result<String, StructureError> {
    let text = child_element(title, "text")?;
    let styled = text
        .children()
        .find(|n| n.is_element())
        .ok_or(StructureError::MissingElement("text-style"))?;

    Ok(styled.text().unwrap_or("").to_string())
}

/// Whitespace prefix of the line a node sits on, taken from the preceding
/// text node. Keeps generated children aligned with the template's layout.
fn leading_indent(node: Node) -> String {
    node.prev_sibling()
        .and_then(|sibling| sibling.text())
        .map(|text| {
            text.rsplit('\n')
                .next()
                .unwrap_or("")
                .chars()
                .take_while(|c| c.is_whitespace())
                .collect()
        })
        .unwrap_or_default()
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
