//! Line-oriented text format for [`NearestNeighborGraph`].
//!
//! # Format
//!
//! ```text
//! <graph name>
//! <max degree>
//! VERTEX
//! <name>\t<index>          one line per live vertex
//! EDGE
//! <source>\t<target>\t<distance>   one line per edge between live vertices
//! ```
//!
//! Deleted vertices and every edge touching them are left out, and the live
//! vertices are renumbered densely from 0 in slot order. The renumbering only
//! exists in the text; the in-memory graph keeps its original slots.
//!
//! Distances use the shortest decimal form that parses back to the same
//! `f64`, so weights survive a round trip bit for bit. No trailing newline is
//! written; input may end with or without one.
//!
//! # Example
//!
//! ```rust
//! use nngraph_core::NearestNeighborGraph;
//!
//! let mut graph = NearestNeighborGraph::new("demo", 2).unwrap();
//! graph.add_vertices(["A", "B"]).unwrap();
//! graph.propose_edge("A", "B", 0.2).unwrap();
//!
//! let text = graph.to_string();
//! assert_eq!(text, "demo\n2\nVERTEX\nA\t0\nB\t1\nEDGE\n0\t1\t0.2");
//!
//! let restored: NearestNeighborGraph = text.parse().unwrap();
//! assert_eq!(restored.distance("A", "B").unwrap(), Some(0.2));
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Distance, NearestNeighborGraph, Slot};

/// Marker line opening the vertex block.
pub const VERTEX_MARKER: &str = "VERTEX";

/// Marker line opening the edge block.
pub const EDGE_MARKER: &str = "EDGE";

const FIELD_SEPARATOR: char = '\t';

impl NearestNeighborGraph {
    /// Writes the text form of the graph to `writer`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the writer fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        write!(writer, "{self}")?;
        Ok(())
    }

    /// Parses a graph from its text form.
    ///
    /// The result is a fresh graph whose slots equal the indices in the text.
    /// Edges are inserted as-is, without eviction or degree check.
    ///
    /// # Errors
    ///
    /// - `Error::MalformedRecord` if a line does not have the expected shape.
    /// - `Error::NonConsecutiveIndices` if vertex indices are not exactly `0..n`.
    /// - `Error::DuplicateVertex` if a name appears twice.
    /// - `Error::UnknownVertex` if an edge refers to an index with no vertex.
    /// - `Error::EdgeAlreadyExists` if an edge appears twice.
    /// - `Error::Io` if the reader fails.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = Lines::new(reader);

        let (_, name) = lines.header("graph name")?;

        let (number, degree) = lines.header("maximum out-degree")?;
        let max_degree = degree
            .trim()
            .parse::<usize>()
            .map_err(|_| malformed(number, &degree, "maximum out-degree"))?;

        let (number, marker) = lines.header(VERTEX_MARKER)?;
        if marker != VERTEX_MARKER {
            return Err(malformed(number, &marker, VERTEX_MARKER));
        }

        let mut vertices = Vec::new();
        while let Some((number, line)) = lines.next_line()? {
            if line == EDGE_MARKER {
                break;
            }
            vertices.push(parse_vertex(number, &line)?);
        }
        vertices.sort_by_key(|(index, _)| *index);
        check_consecutive(&vertices)?;

        let mut graph = Self::with_vertices(
            &name,
            vertices.iter().map(|(_, name)| name.as_str()),
            max_degree,
        )?;

        while let Some((number, line)) = lines.next_line()? {
            let (source, target, distance) = parse_edge(number, &line)?;
            graph.add_edge_slot(source, target, distance)?;
        }

        debug!(
            name = graph.name(),
            max_degree,
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "graph parsed"
        );
        Ok(graph)
    }

    /// Writes the graph to a file, replacing any existing content.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be created or written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;

        debug!(
            path = %path.display(),
            vertices = self.vertex_count(),
            edges = self.edge_count(),
            "graph saved"
        );
        Ok(())
    }

    /// Reads a graph from a file written by [`Self::save`].
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read, or any error of
    /// [`Self::read_from`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let graph = Self::read_from(BufReader::new(File::open(path)?))?;
        debug!(path = %path.display(), "graph loaded");
        Ok(graph)
    }
}

impl fmt::Display for NearestNeighborGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry();

        writeln!(f, "{}", self.name())?;
        writeln!(f, "{}", self.max_degree())?;

        // Compacted index per slot; `None` for deleted slots.
        let mut compacted: Vec<Option<usize>> = vec![None; registry.total_slots()];
        f.write_str(VERTEX_MARKER)?;
        for (index, (slot, name)) in registry.live_slots().enumerate() {
            compacted[slot as usize] = Some(index);
            write!(f, "\n{name}{FIELD_SEPARATOR}{index}")?;
        }

        write!(f, "\n{EDGE_MARKER}")?;
        for (source, edge) in self.edge_store().iter() {
            let endpoints = (
                compacted[source as usize],
                compacted[edge.target() as usize],
            );
            if let (Some(source), Some(target)) = endpoints {
                write!(
                    f,
                    "\n{source}{FIELD_SEPARATOR}{target}{FIELD_SEPARATOR}{}",
                    edge.distance()
                )?;
            }
        }
        Ok(())
    }
}

impl FromStr for NearestNeighborGraph {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::read_from(s.as_bytes())
    }
}

/// Line reader that tracks 1-based line numbers and drops a trailing `\r`.
struct Lines<R> {
    inner: std::io::Lines<R>,
    number: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self {
            inner: reader.lines(),
            number: 0,
        }
    }

    fn next_line(&mut self) -> Result<Option<(usize, String)>> {
        let Some(line) = self.inner.next().transpose()? else {
            return Ok(None);
        };
        self.number += 1;
        let line = match line.strip_suffix('\r') {
            Some(stripped) => stripped.to_string(),
            None => line,
        };
        Ok(Some((self.number, line)))
    }

    /// Reads a header line that must be present.
    fn header(&mut self, expected: &'static str) -> Result<(usize, String)> {
        match self.next_line()? {
            Some(line) => Ok(line),
            None => Err(malformed(self.number + 1, "", expected)),
        }
    }
}

fn malformed(line: usize, content: &str, expected: &'static str) -> Error {
    Error::MalformedRecord {
        line,
        content: content.to_string(),
        expected,
    }
}

const VERTEX_SHAPE: &str = "vertex record <name>\\t<index>";
const EDGE_SHAPE: &str = "edge record <source>\\t<target>\\t<distance>";

fn parse_vertex(number: usize, line: &str) -> Result<(usize, String)> {
    let mut fields = line.split(FIELD_SEPARATOR);
    let (Some(name), Some(index), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(malformed(number, line, VERTEX_SHAPE));
    };
    if name.is_empty() {
        return Err(malformed(number, line, VERTEX_SHAPE));
    }
    let index = index
        .parse::<usize>()
        .map_err(|_| malformed(number, line, VERTEX_SHAPE))?;
    Ok((index, name.to_string()))
}

fn parse_edge(number: usize, line: &str) -> Result<(Slot, Slot, Distance)> {
    let mut fields = line.split(FIELD_SEPARATOR);
    let (Some(source), Some(target), Some(distance), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed(number, line, EDGE_SHAPE));
    };
    let parsed = (
        source.parse::<Slot>(),
        target.parse::<Slot>(),
        distance.parse::<Distance>(),
    );
    match parsed {
        (Ok(source), Ok(target), Ok(distance)) => Ok((source, target, distance)),
        _ => Err(malformed(number, line, EDGE_SHAPE)),
    }
}

/// Checks that sorted vertex indices are exactly `0, 1, ..., n - 1`.
fn check_consecutive(vertices: &[(usize, String)]) -> Result<()> {
    for (position, (index, name)) in vertices.iter().enumerate() {
        if *index != position {
            let previous = position
                .checked_sub(1)
                .map(|before| vertices[before].1.clone());
            return Err(Error::NonConsecutiveIndices {
                previous,
                next: name.clone(),
                index: *index,
            });
        }
    }
    Ok(())
}
