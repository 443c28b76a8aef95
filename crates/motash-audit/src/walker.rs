//! Folder traversal: picks the folders in scope and evaluates their tasks.

use motash_core::{Failure, MotashError, Result};
use regex::{Regex, RegexBuilder};

use crate::evaluator::TaskEvaluator;
use crate::source::TaskFolder;

/// Walks the folder tree below a root.
///
/// The name filter only applies to the root's direct subfolders. Once a
/// subfolder matches, everything below it is in scope.
pub struct FolderWalker<'a> {
    evaluator: &'a TaskEvaluator,
    filter: Option<Regex>,
    folders_checked: usize,
    tasks_checked: usize,
}

impl<'a> FolderWalker<'a> {
    /// `pattern` is a case-insensitive regex; empty matches every folder.
    pub fn new(evaluator: &'a TaskEvaluator, pattern: &str) -> Result<Self> {
        let filter = if pattern.is_empty() {
            None
        } else {
            let re = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| MotashError::Config(format!("Invalid RootFolderPattern '{pattern}': {e}")))?;
            Some(re)
        };
        Ok(Self {
            evaluator,
            filter,
            folders_checked: 0,
            tasks_checked: 0,
        })
    }

    /// Evaluate every task directly in `folder`.
    pub fn check_tasks(&mut self, folder: &dyn TaskFolder, failures: &mut Vec<Failure>) -> Result<()> {
        self.folders_checked += 1;
        for task in folder.tasks()? {
            self.tasks_checked += 1;
            if let Some(failure) = self.evaluator.evaluate(task.as_ref()) {
                tracing::info!("❌ {} ({})", failure.path, failure.result);
                failures.push(failure);
            }
        }
        Ok(())
    }

    /// Walk the subfolders of `root`. Failures found before an error stay in `failures`.
    pub fn walk(&mut self, root: &dyn TaskFolder, failures: &mut Vec<Failure>) -> Result<()> {
        let filter = self.filter.clone();
        self.process_folder(root, filter.as_ref(), failures)
    }

    fn process_folder(
        &mut self,
        folder: &dyn TaskFolder,
        filter: Option<&Regex>,
        failures: &mut Vec<Failure>,
    ) -> Result<()> {
        for sub in folder.subfolders()? {
            if let Some(re) = filter
                && !re.is_match(sub.name())
            {
                tracing::debug!("Skipping folder '{}'", sub.name());
                continue;
            }

            self.check_tasks(sub.as_ref(), failures)?;
            self.process_folder(sub.as_ref(), None, failures)?;
        }
        Ok(())
    }

    pub fn folders_checked(&self) -> usize {
        self.folders_checked
    }

    pub fn tasks_checked(&self) -> usize {
        self.tasks_checked
    }
}
