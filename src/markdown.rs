use std::fmt;

/// Wraps a slice so it renders as a markdown-style bulleted list. Useful
/// for multiline log statements which need to include a collection.
pub struct MdList<'data, T>(pub &'data [T]);

impl<'data, T> fmt::Display for MdList<'data, T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\n")?;
        for entry in self.0 {
            f.write_fmt(format_args!("- {}\n", entry))?;
        }
        Ok(())
    }
}
