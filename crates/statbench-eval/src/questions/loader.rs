//! Question loading from TOML files
//!
//! One question per `*.toml` file. Files are read in file-name order so the
//! display order of a run is stable across platforms.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{Category, Difficulty, Question};

/// Selection applied after loading; empty lists match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    pub categories: Vec<Category>,
    pub difficulties: Vec<Difficulty>,
    pub ids: Vec<String>,
}

impl QuestionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_difficulties(mut self, difficulties: Vec<Difficulty>) -> Self {
        self.difficulties = difficulties;
        self
    }

    pub fn with_ids(mut self, ids: Vec<String>) -> Self {
        self.ids = ids;
        self
    }

    pub fn matches(&self, question: &Question) -> bool {
        (self.categories.is_empty() || self.categories.contains(&question.category))
            && (self.difficulties.is_empty() || self.difficulties.contains(&question.difficulty))
            && (self.ids.is_empty() || self.ids.iter().any(|id| id == &question.id))
    }
}

/// Question counts for the `list` command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuestionStatistics {
    pub total: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub by_difficulty: BTreeMap<Difficulty, usize>,
    pub requiring_tools: usize,
}

/// Loader for the question bank
pub struct QuestionLoader {
    questions_dir: PathBuf,
}

impl QuestionLoader {
    pub fn new(questions_dir: impl AsRef<Path>) -> Self {
        Self {
            questions_dir: questions_dir.as_ref().to_path_buf(),
        }
    }

    pub fn questions_dir(&self) -> &Path {
        &self.questions_dir
    }

    /// Load every valid question
    ///
    /// Unreadable or invalid files are skipped with a warning. A missing
    /// directory yields an empty bank.
    pub fn load_all(&self) -> Result<Vec<Question>> {
        let mut questions = Vec::new();

        if !self.questions_dir.exists() {
            warn!("Questions directory {:?} does not exist", self.questions_dir);
            return Ok(questions);
        }

        let mut seen = HashSet::new();
        for entry in WalkDir::new(&self.questions_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry
                .with_context(|| format!("Failed to read questions directory {:?}", self.questions_dir))?;
            let path = entry.path();
            if !Self::is_question_file(path) {
                continue;
            }

            match Self::load_file(path) {
                Ok(question) => {
                    if seen.insert(question.id.clone()) {
                        questions.push(question);
                    } else {
                        warn!("Skipping {:?}: duplicate question id '{}'", path, question.id);
                    }
                }
                Err(e) => warn!("Failed to load question from {:?}: {:#}", path, e),
            }
        }

        debug!(count = questions.len(), dir = ?self.questions_dir, "questions loaded");
        Ok(questions)
    }

    /// Load and filter, preserving file order
    pub fn load(&self, filter: &QuestionFilter) -> Result<Vec<Question>> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|question| filter.matches(question))
            .collect())
    }

    pub fn load_by_id(&self, id: &str) -> Result<Option<Question>> {
        Ok(self.load_all()?.into_iter().find(|q| q.id == id))
    }

    /// Parse and validate a single question file
    pub fn load_file(path: &Path) -> Result<Question> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read question file: {:?}", path))?;
        let question: Question = toml::from_str(&content)
            .with_context(|| format!("Failed to parse question: {:?}", path))?;
        question.validate()?;
        Ok(question)
    }

    pub fn statistics(&self) -> Result<QuestionStatistics> {
        let questions = self.load_all()?;
        let mut stats = QuestionStatistics {
            total: questions.len(),
            ..Default::default()
        };

        for question in &questions {
            *stats.by_category.entry(question.category).or_insert(0) += 1;
            *stats.by_difficulty.entry(question.difficulty).or_insert(0) += 1;
            if question.requires_tools {
                stats.requiring_tools += 1;
            }
        }

        Ok(stats)
    }

    fn is_question_file(path: &Path) -> bool {
        path.is_file() && path.extension().is_some_and(|ext| ext == "toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_question(dir: &Path, file: &str, id: &str, category: &str, difficulty: &str) {
        let body = format!(
            r#"id = "{id}"
category = "{category}"
difficulty = "{difficulty}"
prompt = "Question {id}"

[expected_answer]
type = "numeric"
value = 1.0
"#
        );
        std::fs::write(dir.join(file), body).unwrap();
    }

    fn bank() -> TempDir {
        let dir = TempDir::new().unwrap();
        write_question(dir.path(), "b_ci.toml", "ci_001", "confidence_intervals", "easy");
        write_question(dir.path(), "a_power.toml", "power_001", "power_analysis", "hard");
        write_question(dir.path(), "c_power.toml", "power_002", "power_analysis", "easy");
        std::fs::write(dir.path().join("notes.txt"), "not a question").unwrap();
        dir
    }

    #[test]
    fn test_load_all_in_file_name_order() {
        let dir = bank();
        let loader = QuestionLoader::new(dir.path());
        let ids: Vec<String> = loader.load_all().unwrap().into_iter().map(|q| q.id).collect();
        assert_eq!(ids, vec!["power_001", "ci_001", "power_002"]);
    }

    #[test]
    fn test_invalid_files_skipped() {
        let dir = bank();
        std::fs::write(dir.path().join("broken.toml"), "id = ").unwrap();
        std::fs::write(
            dir.path().join("hybrid.toml"),
            r#"id = "hybrid_001"
category = "effect_size"
difficulty = "medium"
prompt = "q"

[expected_answer]
type = "numeric"
value = 0.5

[evaluation]
method = "hybrid"
numeric_weight = 0.7
"#,
        )
        .unwrap();
        write_question(dir.path(), "d_dup.toml", "ci_001", "effect_size", "easy");

        let loader = QuestionLoader::new(dir.path());
        let questions = loader.load_all().unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[1].category, Category::ConfidenceIntervals);
    }

    #[test]
    fn test_filtering() {
        let dir = bank();
        let loader = QuestionLoader::new(dir.path());

        let filter = QuestionFilter::new().with_categories(vec![Category::PowerAnalysis]);
        assert_eq!(loader.load(&filter).unwrap().len(), 2);

        let filter = filter.with_difficulties(vec![Difficulty::Easy]);
        let questions = loader.load(&filter).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id, "power_002");

        let filter = QuestionFilter::new().with_ids(vec!["ci_001".to_string(), "missing".to_string()]);
        assert_eq!(loader.load(&filter).unwrap().len(), 1);
        assert!(loader.load_by_id("missing").unwrap().is_none());
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let loader = QuestionLoader::new("/definitely/not/here");
        assert!(loader.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_statistics() {
        let dir = bank();
        let stats = QuestionLoader::new(dir.path()).statistics().unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_category.get(&Category::PowerAnalysis), Some(&2));
        assert_eq!(stats.by_difficulty.get(&Difficulty::Easy), Some(&2));
        assert_eq!(stats.requiring_tools, 0);
    }
}
