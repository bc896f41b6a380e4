//! Named buffers kept by the shell.

use std::collections::BTreeMap;
use std::fmt::Write;

use buftool_core::types::Offset;
use buftool_core::{BufferResult, ByteBuffer};
use tracing::debug;

use crate::error::{ShellError, ShellResult};

/// Buffers by name, listed in name order
#[derive(Debug, Default)]
pub struct Registry
{
    buffers: BTreeMap<String, ByteBuffer>,
}

impl Registry
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// The buffer called `name`, created empty on first use
    pub fn get_or_create(&mut self, name: &str) -> &mut ByteBuffer
    {
        self.buffers.entry(name.to_string()).or_insert_with(|| {
            debug!(buffer = name, "created buffer");
            ByteBuffer::new(name)
        })
    }

    pub fn get(&self, name: &str) -> Option<&ByteBuffer>
    {
        self.buffers.get(name)
    }

    pub fn delete(&mut self, name: &str) -> ShellResult<ByteBuffer>
    {
        self.buffers
            .remove(name)
            .ok_or_else(|| ShellError::UnknownBuffer(name.to_string()))
    }

    pub fn len(&self) -> usize
    {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.buffers.is_empty()
    }

    /// Copy between two named buffers, creating either one if needed
    ///
    /// When `dst` and `src` name the same buffer, the bytes come from a
    /// snapshot taken before the copy starts.
    pub fn copy(
        &mut self,
        dst: &str,
        src: &str,
        dst_offset: Offset,
        src_offset: usize,
        length: usize,
    ) -> BufferResult<usize>
    {
        if dst == src {
            let buffer = self.get_or_create(dst);
            let snapshot = buffer.clone();
            return buffer.copy(&snapshot, dst_offset, src_offset, length);
        }

        self.get_or_create(src);
        let mut target = self.buffers.remove(dst).unwrap_or_else(|| ByteBuffer::new(dst));
        let result = match self.buffers.get(src) {
            Some(source) => target.copy(source, dst_offset, src_offset, length),
            None => Ok(0),
        };
        self.buffers.insert(dst.to_string(), target);
        result
    }

    /// Name and size of every buffer
    pub fn summary(&self) -> String
    {
        let mut rows = vec![vec!["Name".to_string(), "Size".to_string()]];
        rows.extend(
            self.buffers
                .values()
                .map(|buffer| vec![buffer.name().to_string(), size_cell(buffer.len())]),
        );
        render_table(&rows)
    }

    /// Name, size and storage address of one buffer
    pub fn describe(&self, name: &str) -> ShellResult<String>
    {
        let buffer = self.get(name).ok_or_else(|| ShellError::UnknownBuffer(name.to_string()))?;
        let address = buffer
            .storage_address()
            .map_or_else(|| "-".to_string(), |addr| format!("{addr:#x}"));

        Ok(render_table(&[
            vec!["Name".to_string(), "Size".to_string(), "Address".to_string()],
            vec![buffer.name().to_string(), size_cell(buffer.len()), address],
        ]))
    }
}

fn size_cell(size: usize) -> String
{
    format!("{size:#x} ({size})")
}

/// Left-aligned columns separated by `|`, with a rule under the header
///
/// A table with no rows below the header renders as nothing.
fn render_table(rows: &[Vec<String>]) -> String
{
    if rows.len() <= 1 {
        return String::new();
    }

    let cols = rows[0].len();
    let widths: Vec<usize> = (0..cols)
        .map(|col| rows.iter().map(|row| row[col].len()).max().unwrap_or(0))
        .collect();
    let rule_width = widths.iter().sum::<usize>() + 3 * (cols - 1) + 2;

    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        let _ = writeln!(out, "  {}", cells.join(" | ").trim_end());
        if i == 0 {
            let _ = writeln!(out, " {}", "-".repeat(rule_width));
        }
    }
    out.push('\n');
    out
}
