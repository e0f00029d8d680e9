use crate::grouping::SeriesGroups;
use crate::sorting::SortedSlices;
use std::fmt;

/// Text report listing series groups and their files
pub struct GroupsReport<'a> {
    groups: &'a SeriesGroups,
}

impl<'a> GroupsReport<'a> {
    /// Creates a new groups report
    pub fn new(groups: &'a SeriesGroups) -> Self {
        Self { groups }
    }
}

impl<'a> fmt::Display for GroupsReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Series Groups")?;
        writeln!(f, "=============")?;
        writeln!(f)?;

        if self.groups.is_empty() {
            writeln!(f, "No series found")?;
            return Ok(());
        }

        for (key, files) in self.groups.iter() {
            writeln!(f, "{}", key)?;
            writeln!(f, "  Files: {}", files.len())?;
            for file in files {
                writeln!(f, "  {}", file.display())?;
            }
            writeln!(f)?;
        }

        writeln!(
            f,
            "Total: {} groups, {} files",
            self.groups.len(),
            self.groups.total_files()
        )
    }
}

/// Text report for one group in slice order
pub struct SlicesReport<'a> {
    sorted: &'a SortedSlices,
}

impl<'a> SlicesReport<'a> {
    /// Creates a new slices report
    pub fn new(sorted: &'a SortedSlices) -> Self {
        Self { sorted }
    }
}

impl<'a> fmt::Display for SlicesReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Slice Order")?;
        writeln!(f, "===========")?;
        writeln!(f)?;
        for (index, file) in self.sorted.files.iter().enumerate() {
            writeln!(f, "{:>4}  {}", index, file.display())?;
        }
        writeln!(f)?;
        writeln!(f, "Planes:         {}", self.sorted.planes)?;
        match self.sorted.time_steps {
            Some(steps) => writeln!(f, "Time Steps:     {}", steps)?,
            None => writeln!(f, "Time Steps:     irregular")?,
        }
        Ok(())
    }
}
