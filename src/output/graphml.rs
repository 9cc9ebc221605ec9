//! GraphML export
//!
//! Serializes a [`SiteGraph`] as an indented GraphML document: one `node` per
//! crawled page and one `edge` per recorded link whose target was itself
//! crawled. Links to pages outside the graph are omitted.

use crate::graph::SiteGraph;
use crate::output::OutputResult;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use xml::common::XmlVersion;
use xml::writer::{EmitterConfig, EventWriter, XmlEvent};

const GRAPHML_NS: &str = "http://graphml.graphdrawing.org/xmlns";
const NODE_KEY: &str = "node_id";
const EDGE_KEY: &str = "edge_id";

/// Converts a site graph to a GraphML document
///
/// Node ids are `n0, n1, …` in crawl order and edge ids `e0, e1, …` in
/// source order then link order. Output depends only on the graph, so the
/// same graph always yields byte-identical XML.
///
/// # Example
///
/// ```
/// use link_atlas::output::to_graphml;
/// use link_atlas::SiteGraph;
///
/// let xml = to_graphml(&SiteGraph::new()).unwrap();
/// assert!(xml.contains(r#"<graph id="G" edgedefault="directed""#));
/// ```
pub fn to_graphml(graph: &SiteGraph) -> OutputResult<String> {
    let buffer = write_document(graph, Vec::new())?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Writes the GraphML document for a graph to a file
///
/// # Arguments
///
/// * `graph` - The site graph
/// * `output_path` - Path where the GraphML file should be written
pub fn write_graphml(graph: &SiteGraph, output_path: &Path) -> OutputResult<()> {
    let file = BufWriter::new(File::create(output_path)?);
    let mut file = write_document(graph, file)?;
    file.flush()?;

    Ok(())
}

/// Emits the document into `target` and hands it back, newline-terminated
fn write_document<W: Write>(graph: &SiteGraph, target: W) -> OutputResult<W> {
    let mut writer = EmitterConfig::new()
        .perform_indent(true)
        .indent_string("    ")
        .create_writer(target);

    writer.write(XmlEvent::StartDocument {
        version: XmlVersion::Version10,
        encoding: Some("UTF-8"),
        standalone: None,
    })?;
    writer.write(XmlEvent::start_element("graphml").default_ns(GRAPHML_NS))?;
    write_key(&mut writer, NODE_KEY, "node")?;
    write_key(&mut writer, EDGE_KEY, "edge")?;
    writer.write(
        XmlEvent::start_element("graph")
            .attr("id", "G")
            .attr("edgedefault", "directed"),
    )?;

    // Nodes
    for (index, page) in graph.pages().enumerate() {
        let id = format!("n{}", index);
        write_labelled(
            &mut writer,
            XmlEvent::start_element("node").attr("id", &id),
            NODE_KEY,
            page.as_str(),
        )?;
    }

    // Edges
    let mut edge_index = 0;
    for (source_index, (source, targets)) in graph.iter().enumerate() {
        for target in targets {
            let Some(target_index) = graph.index_of(target.as_str()) else {
                continue;
            };

            let id = format!("e{}", edge_index);
            let source_id = format!("n{}", source_index);
            let target_id = format!("n{}", target_index);
            write_labelled(
                &mut writer,
                XmlEvent::start_element("edge")
                    .attr("id", &id)
                    .attr("source", &source_id)
                    .attr("target", &target_id),
                EDGE_KEY,
                &format!("{} → {}", source, target),
            )?;
            edge_index += 1;
        }
    }

    writer.write(XmlEvent::end_element())?; // graph
    writer.write(XmlEvent::end_element())?; // graphml

    let mut target = writer.into_inner();
    target.write_all(b"\n")?;
    Ok(target)
}

fn write_key<W: Write>(writer: &mut EventWriter<W>, id: &str, domain: &str) -> OutputResult<()> {
    writer.write(
        XmlEvent::start_element("key")
            .attr("id", id)
            .attr("for", domain)
            .attr("attr.name", "label")
            .attr("attr.type", "string"),
    )?;
    writer.write(XmlEvent::end_element())?;
    Ok(())
}

/// Writes a `node`/`edge` element holding one `data` child
fn write_labelled<'a, W, E>(
    writer: &mut EventWriter<W>,
    element: E,
    key: &str,
    label: &str,
) -> OutputResult<()>
where
    W: Write,
    E: Into<XmlEvent<'a>>,
{
    writer.write(element)?;
    writer.write(XmlEvent::start_element("data").attr("key", key))?;
    writer.write(XmlEvent::characters(label))?;
    writer.write(XmlEvent::end_element())?;
    writer.write(XmlEvent::end_element())?;
    Ok(())
}
