use serde::{Deserialize, Serialize};

use crate::error::CalcError;

/// Model pricing information
///
/// Prices are in USD per 1,000 units (tokens).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub input_price: f64,
    pub output_price: f64,
}

impl ModelPricing {
    pub fn new(id: &str, name: &str, description: &str, input_price: f64, output_price: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            input_price,
            output_price,
        }
    }
}

/// Context window size option
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContextWindowOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tokens: u64,
}

/// Usage preset that bulk-populates the calculator inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UsagePreset {
    pub id: &'static str,
    pub name: &'static str,
    pub model: &'static str,
    pub monthly_users: u64,
    pub prompts_per_user: u64,
    pub input_length: f64,
    pub output_length: f64,
    pub context_window: &'static str,
}

pub const CONTEXT_WINDOWS: &[ContextWindowOption] = &[
    ContextWindowOption {
        id: "4k",
        name: "Small (4K)",
        description: "Good for short conversations",
        tokens: 4_000,
    },
    ContextWindowOption {
        id: "8k",
        name: "Medium (8K)",
        description: "Standard for most apps",
        tokens: 8_000,
    },
    ContextWindowOption {
        id: "16k",
        name: "Large (16K)",
        description: "For longer conversations",
        tokens: 16_000,
    },
    ContextWindowOption {
        id: "32k",
        name: "Extra Large (32K)",
        description: "For complex tasks with context",
        tokens: 32_000,
    },
    ContextWindowOption {
        id: "128k",
        name: "Maximum (128K)",
        description: "For specialized applications",
        tokens: 128_000,
    },
];

pub const USAGE_PRESETS: &[UsagePreset] = &[
    UsagePreset {
        id: "chatbot",
        name: "Chatbot SaaS",
        model: "gpt-3.5-turbo",
        monthly_users: 1000,
        prompts_per_user: 30,
        input_length: 100.0,
        output_length: 300.0,
        context_window: "8k",
    },
    UsagePreset {
        id: "writing",
        name: "AI Writing App",
        model: "gpt-4-turbo",
        monthly_users: 500,
        prompts_per_user: 20,
        input_length: 200.0,
        output_length: 800.0,
        context_window: "16k",
    },
    UsagePreset {
        id: "support",
        name: "AI Support Bot",
        model: "claude-sonnet",
        monthly_users: 2000,
        prompts_per_user: 10,
        input_length: 150.0,
        output_length: 250.0,
        context_window: "4k",
    },
    UsagePreset {
        id: "custom",
        name: "Custom (Manual Entry)",
        model: "gpt-4-turbo",
        monthly_users: 100,
        prompts_per_user: 10,
        input_length: 200.0,
        output_length: 800.0,
        context_window: "8k",
    },
];

/// Built-in model price list
pub fn builtin_models() -> Vec<ModelPricing> {
    vec![
        ModelPricing::new("gpt-4-turbo", "GPT-4 Turbo", "Very accurate, moderate cost", 0.01, 0.03),
        ModelPricing::new("gpt-3.5-turbo", "GPT-3.5 Turbo", "Fast, affordable option", 0.0005, 0.0015),
        ModelPricing::new("claude-opus", "Claude Opus", "Premium quality, highest cost", 0.015, 0.075),
        ModelPricing::new("claude-sonnet", "Claude Sonnet", "High quality, reasonable cost", 0.003, 0.015),
        ModelPricing::new(
            "mistral-7b",
            "Mistral 7B",
            "Budget-friendly, good for simple tasks",
            0.0002,
            0.0002,
        ),
    ]
}

pub fn find_context_window(id: &str) -> Result<&'static ContextWindowOption, CalcError> {
    CONTEXT_WINDOWS
        .iter()
        .find(|w| w.id == id)
        .ok_or_else(|| CalcError::UnknownContextWindow(id.to_string()))
}

pub fn find_preset(id: &str) -> Result<&'static UsagePreset, CalcError> {
    USAGE_PRESETS
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| CalcError::UnknownPreset(id.to_string()))
}

/// Read-only model catalog
///
/// Built-in entries come first; configured entries override built-ins with
/// the same id and are otherwise appended.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelPricing>,
}

impl ModelCatalog {
    pub fn new(extra: &[ModelPricing]) -> Self {
        let mut models = builtin_models();
        for entry in extra {
            match models.iter_mut().find(|m| m.id == entry.id) {
                Some(existing) => *existing = entry.clone(),
                None => models.push(entry.clone()),
            }
        }
        Self { models }
    }

    pub fn find(&self, id: &str) -> Result<&ModelPricing, CalcError> {
        self.models
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| CalcError::UnknownModel(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.models.iter().any(|m| m.id == id)
    }

    pub fn models(&self) -> &[ModelPricing] {
        &self.models
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::new(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_lookup() {
        let catalog = ModelCatalog::default();
        let model = catalog.find("gpt-4-turbo").unwrap();
        assert_eq!(model.name, "GPT-4 Turbo");
        assert_eq!(model.input_price, 0.01);
        assert_eq!(model.output_price, 0.03);
        assert_eq!(catalog.models().len(), 5);
    }

    #[test]
    fn test_unknown_model() {
        let catalog = ModelCatalog::default();
        assert_eq!(
            catalog.find("gpt-5").unwrap_err(),
            CalcError::UnknownModel("gpt-5".to_string())
        );
    }

    #[test]
    fn test_extra_models_override_and_append() {
        let extra = vec![
            ModelPricing::new("gpt-4-turbo", "GPT-4 Turbo (negotiated)", "", 0.008, 0.024),
            ModelPricing::new("llama-70b", "Llama 70B", "Self-hosted", 0.0009, 0.0009),
        ];
        let catalog = ModelCatalog::new(&extra);

        assert_eq!(catalog.models().len(), 6);
        assert_eq!(catalog.find("gpt-4-turbo").unwrap().input_price, 0.008);
        assert!(catalog.contains("llama-70b"));
        // Overrides keep their position
        assert_eq!(catalog.models()[0].id, "gpt-4-turbo");
    }

    #[test]
    fn test_presets_reference_known_entries() {
        let catalog = ModelCatalog::default();
        for preset in USAGE_PRESETS {
            assert!(catalog.contains(preset.model), "{} has unknown model", preset.id);
            assert!(find_context_window(preset.context_window).is_ok());
        }
        assert_eq!(find_preset("support").unwrap().monthly_users, 2000);
        assert!(find_preset("nope").is_err());
    }
}
