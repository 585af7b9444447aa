//! Prompt catalog access.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The full prompt catalog: reusable prompts by type plus adaptive prompt
/// sets keyed by year level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptCatalog {
    pub prompts: BTreeMap<String, String>,
    pub adaptive: BTreeMap<u32, Vec<String>>,
}

/// Read access to the prompt catalog.
pub trait PromptLibrary: Send + Sync {
    fn catalog(&self) -> PromptCatalog;

    fn prompt(&self, prompt_type: &str) -> Option<String>;

    fn adaptive_prompts(&self, year_level: u32) -> Option<Vec<String>>;
}

/// Built-in catalog used when no external prompt source is wired in.
pub struct StaticPromptLibrary {
    catalog: PromptCatalog,
}

impl StaticPromptLibrary {
    pub fn built_in() -> Self {
        let mut prompts = BTreeMap::new();
        prompts.insert(
            "encouragement".to_string(),
            "Nice progress! Try explaining your last change out loud.".to_string(),
        );
        prompts.insert(
            "hint".to_string(),
            "Look at the error message first. Which line does it point to?".to_string(),
        );
        prompts.insert(
            "debugging".to_string(),
            "Add a print statement before the line that fails and check the values.".to_string(),
        );
        prompts.insert(
            "reflection".to_string(),
            "What was the trickiest part of this exercise, and how did you get past it?"
                .to_string(),
        );

        let mut adaptive = BTreeMap::new();
        adaptive.insert(
            7,
            vec![
                "Draw what the loop does on paper before running it.".to_string(),
                "Rename one variable so its purpose is obvious.".to_string(),
            ],
        );
        adaptive.insert(
            8,
            vec![
                "Split the problem into two functions and test each alone.".to_string(),
                "Predict the output before you run the code.".to_string(),
            ],
        );
        adaptive.insert(
            9,
            vec![
                "Write one test case that should fail, then make it pass.".to_string(),
                "Where could this code break with unexpected input?".to_string(),
            ],
        );
        adaptive.insert(
            10,
            vec![
                "Refactor the repeated code into a helper without changing behavior.".to_string(),
                "Compare the time your two approaches take on large input.".to_string(),
            ],
        );

        Self {
            catalog: PromptCatalog { prompts, adaptive },
        }
    }

    pub fn from_catalog(catalog: PromptCatalog) -> Self {
        Self { catalog }
    }
}

impl PromptLibrary for StaticPromptLibrary {
    fn catalog(&self) -> PromptCatalog {
        self.catalog.clone()
    }

    fn prompt(&self, prompt_type: &str) -> Option<String> {
        self.catalog.prompts.get(prompt_type).cloned()
    }

    fn adaptive_prompts(&self, year_level: u32) -> Option<Vec<String>> {
        self.catalog.adaptive.get(&year_level).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_catalog_has_core_types() {
        let library = StaticPromptLibrary::built_in();
        for prompt_type in ["encouragement", "hint", "debugging", "reflection"] {
            assert!(library.prompt(prompt_type).is_some(), "{prompt_type} missing");
        }
        assert!(library.prompt("nonexistent").is_none());
    }

    #[test]
    fn adaptive_prompts_are_per_year_level() {
        let library = StaticPromptLibrary::built_in();
        assert!(library.adaptive_prompts(9).is_some());
        assert!(library.adaptive_prompts(3).is_none());
    }
}
