//! Output writer with indentation tracking and format attributes
//!
//! Handles writing generated code with proper indentation. Nested blocks use [`ScopedIndent`], which raises the
//! indentation for its lifetime and derefs to the writer.
//!
//! [`FormatAttr`] is a small counter-based switch consulted by renderers (e.g. "parameters are passed by const
//! reference"). It uses interior mutability so a scoped guard can be held while the renderer keeps borrowing its
//! context immutably.

use std::cell::Cell;
use std::ops::{Deref, DerefMut};

/// Settings shared by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Spaces per indentation level
    pub indent_width: usize,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self { indent_width: 2 }
    }
}

impl CodegenOptions {
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }
}

// ============================================================================
// CodeWriter
// ============================================================================

/// Writer that tracks indentation and builds generated output
#[derive(Debug, Clone)]
pub struct CodeWriter {
    output: String,
    indent_level: usize,
    options: CodegenOptions,
    /// Whether we're at the start of a line
    at_line_start: bool,
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new(CodegenOptions::default())
    }
}

impl CodeWriter {
    pub fn new(options: CodegenOptions) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            options,
            at_line_start: true,
        }
    }

    /// Get the generated output
    pub fn finish(self) -> String {
        self.output
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn write_indent(&mut self) {
        if self.at_line_start {
            let width = self.indent_level * self.options.indent_width;
            self.output.extend(std::iter::repeat_n(' ', width));
            self.at_line_start = false;
        }
    }

    /// Write a string, indenting first if at line start
    pub fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.write_indent();
        self.output.push_str(s);
    }

    /// Write a string and newline
    pub fn writeln(&mut self, s: &str) {
        self.write(s);
        self.newline();
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }
}

/// Raises the writer's indentation until dropped.
pub struct ScopedIndent<'a> {
    writer: &'a mut CodeWriter,
}

impl<'a> ScopedIndent<'a> {
    pub fn new(writer: &'a mut CodeWriter) -> Self {
        writer.indent();
        Self { writer }
    }
}

impl Deref for ScopedIndent<'_> {
    type Target = CodeWriter;

    fn deref(&self) -> &CodeWriter {
        self.writer
    }
}

impl DerefMut for ScopedIndent<'_> {
    fn deref_mut(&mut self) -> &mut CodeWriter {
        self.writer
    }
}

impl Drop for ScopedIndent<'_> {
    fn drop(&mut self) {
        self.writer.dedent();
    }
}

// ============================================================================
// Format attributes
// ============================================================================

/// A switch that is on while activated at least once and not blocked.
#[derive(Debug, Default)]
pub struct FormatAttr {
    active: Cell<u32>,
    block: Cell<u32>,
}

impl FormatAttr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&self) {
        self.active.set(self.active.get() + 1);
    }

    pub fn deactivate(&self) {
        self.active.set(self.active.get().saturating_sub(1));
    }

    pub fn block(&self) {
        self.block.set(self.block.get() + 1);
    }

    pub fn unblock(&self) {
        self.block.set(self.block.get().saturating_sub(1));
    }

    pub fn is_active(&self) -> bool {
        self.active.get() > 0 && self.block.get() == 0
    }

    fn snapshot(&self) -> (u32, u32) {
        (self.active.get(), self.block.get())
    }

    fn restore(&self, (active, block): (u32, u32)) {
        self.active.set(active);
        self.block.set(block);
    }
}

/// Activates a [`FormatAttr`] until dropped, then restores the previous counters.
pub struct ScopedFormatAttrActivate<'a> {
    attr: &'a FormatAttr,
    saved: (u32, u32),
}

impl<'a> ScopedFormatAttrActivate<'a> {
    pub fn new(attr: &'a FormatAttr) -> Self {
        let saved = attr.snapshot();
        attr.activate();
        Self { attr, saved }
    }
}

impl Drop for ScopedFormatAttrActivate<'_> {
    fn drop(&mut self) {
        self.attr.restore(self.saved);
    }
}

/// Blocks a [`FormatAttr`] until dropped, then restores the previous counters.
pub struct ScopedFormatAttrBlock<'a> {
    attr: &'a FormatAttr,
    saved: (u32, u32),
}

impl<'a> ScopedFormatAttrBlock<'a> {
    pub fn new(attr: &'a FormatAttr) -> Self {
        let saved = attr.snapshot();
        attr.block();
        Self { attr, saved }
    }
}

impl Drop for ScopedFormatAttrBlock<'_> {
    fn drop(&mut self) {
        self.attr.restore(self.saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_writer() -> CodeWriter {
        CodeWriter::default()
    }

    impl CodeWriter {
        fn is_empty(&self) -> bool {
            self.output.is_empty()
        }
    }

    // ========================================
    // Write tests
    // ========================================

    #[test]
    fn test_new_writer_empty_output() {
        let writer = default_writer();
        assert!(writer.is_empty());
        assert_eq!(writer.finish(), "");
    }

    #[test]
    fn test_write_multiple() {
        let mut writer = default_writer();
        writer.write("hello");
        writer.write(" ");
        writer.write("world");
        assert_eq!(writer.finish(), "hello world");
    }

    #[test]
    fn test_writeln_empty_string() {
        let mut writer = default_writer();
        writer.writeln("");
        assert_eq!(writer.finish(), "\n");
    }

    #[test]
    fn test_newlines_between_content() {
        let mut writer = default_writer();
        writer.writeln("line1");
        writer.newline();
        writer.newline();
        writer.writeln("line2");
        assert_eq!(writer.finish(), "line1\n\n\nline2\n");
    }

    // ========================================
    // Indent tests
    // ========================================

    #[test]
    fn test_dedent_at_zero_stays_zero() {
        let mut writer = default_writer();
        writer.dedent();
        writer.writeln("a");
        writer.indent();
        writer.writeln("b");
        assert_eq!(writer.finish(), "a\n  b\n");
    }

    #[test]
    fn test_indent_only_at_line_start() {
        let mut writer = default_writer();
        writer.indent();
        writer.write("a");
        writer.write("b");
        writer.newline();
        writer.write("c");
        assert_eq!(writer.finish(), "  ab\n  c");
    }

    #[test]
    fn test_indent_width_4() {
        let mut writer = CodeWriter::new(CodegenOptions::default().with_indent_width(4));
        writer.indent();
        writer.write("text");
        assert_eq!(writer.finish(), "    text");
    }

    #[test]
    fn test_scoped_indent_restores_on_drop() {
        let mut writer = default_writer();
        writer.writeln("class A {");
        {
            let mut body = ScopedIndent::new(&mut writer);
            body.writeln("void f();");
            {
                let mut nested = ScopedIndent::new(&mut body);
                nested.writeln("// nested");
            }
            body.writeln("void g();");
        }
        writer.writeln("};");
        assert_eq!(writer.finish(), "class A {\n  void f();\n    // nested\n  void g();\n};\n");
    }

    // ========================================
    // Format attribute tests
    // ========================================

    #[test]
    fn test_format_attr_counters() {
        let attr = FormatAttr::new();
        assert!(!attr.is_active());
        attr.activate();
        attr.activate();
        attr.deactivate();
        assert!(attr.is_active());
        attr.block();
        assert!(!attr.is_active());
        attr.unblock();
        assert!(attr.is_active());
        attr.deactivate();
        attr.deactivate();
        assert!(!attr.is_active());
    }

    #[test]
    fn test_scoped_guards_restore_previous_state() {
        let attr = FormatAttr::new();
        {
            let _on = ScopedFormatAttrActivate::new(&attr);
            assert!(attr.is_active());
            {
                let _off = ScopedFormatAttrBlock::new(&attr);
                assert!(!attr.is_active());
                let _again = ScopedFormatAttrActivate::new(&attr);
                assert!(!attr.is_active());
            }
            assert!(attr.is_active());
        }
        assert!(!attr.is_active());
    }
}
