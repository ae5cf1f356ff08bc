#[cfg(test)]
mod tests {
    use crate::config::{Config, LLMConfig, LLMProvider, PolicyKind, StageTemperatures};
    use crate::i18n::TargetLanguage;
    use crate::search::ToolKind;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.llm.provider, LLMProvider::Gemini);
        assert_eq!(config.target_language, TargetLanguage::English);
        assert_eq!(config.research.policy, PolicyKind::Reasoning);
        assert_eq!(config.research.max_iterations, 3);
        assert!(config.research.forced_tool.is_none());
        assert!(config.output_path.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn test_llm_config_default() {
        let llm = LLMConfig::default();

        assert_eq!(llm.model_efficient, "gemini-2.5-flash");
        assert_eq!(llm.retry_attempts, 1);
        assert_eq!(llm.timeout_seconds, 120);
        assert_eq!(llm.temperatures, StageTemperatures::default());
    }

    #[test]
    fn test_stage_temperatures_default() {
        let t = StageTemperatures::default();

        assert_eq!(t.research, 0.3);
        assert_eq!(t.topic_analysis, 0.4);
        assert_eq!(t.angles, 0.6);
        assert_eq!(t.drafting, 0.5);
        assert_eq!(t.critique, 0.3);
        assert_eq!(t.formatting, 0.2);
    }

    #[test]
    fn test_search_config_default_caps_and_timeouts() {
        let config = Config::default();

        assert_eq!(config.search.gnews.max_results, 5);
        assert_eq!(config.search.gnews.timeout_seconds, Some(10));
        assert_eq!(config.search.tavily.max_results, 5);
        assert!(config.search.tavily.timeout_seconds.is_none());
        assert_eq!(config.search.youtube.max_results, 5);
        assert_eq!(config.search.wikipedia.max_results, 3);
    }

    #[test]
    fn test_llm_provider_from_str() {
        assert_eq!("gemini".parse::<LLMProvider>().unwrap(), LLMProvider::Gemini);
        assert_eq!("OpenAI".parse::<LLMProvider>().unwrap(), LLMProvider::OpenAI);
        assert_eq!("ollama".parse::<LLMProvider>().unwrap(), LLMProvider::Ollama);
        assert!("invalid".parse::<LLMProvider>().is_err());
    }

    #[test]
    fn test_llm_provider_display() {
        assert_eq!(LLMProvider::Gemini.to_string(), "gemini");
        assert_eq!(LLMProvider::Anthropic.to_string(), "anthropic");
        assert_eq!(LLMProvider::OpenRouter.to_string(), "openrouter");
    }

    #[test]
    fn test_policy_kind_from_str() {
        assert_eq!("reasoning".parse::<PolicyKind>().unwrap(), PolicyKind::Reasoning);
        assert_eq!("Keyword".parse::<PolicyKind>().unwrap(), PolicyKind::Keyword);
        assert!("random".parse::<PolicyKind>().is_err());
    }

    #[test]
    fn test_config_from_file_partial() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("strategist.toml");
        fs::write(
            &config_path,
            r#"
target_language = "de"
verbose = true

[llm]
provider = "openai"
api_key = "sk-test"
model_efficient = "gpt-4o-mini"

[llm.temperatures]
drafting = 0.9

[research]
policy = "keyword"
forced_tool = "news"
"#,
        )
        .unwrap();

        let config = Config::from_file(&config_path).unwrap();

        assert_eq!(config.target_language, TargetLanguage::German);
        assert!(config.verbose);
        assert_eq!(config.llm.provider, LLMProvider::OpenAI);
        assert_eq!(config.llm.api_key, "sk-test");
        assert_eq!(config.llm.model_efficient, "gpt-4o-mini");
        assert_eq!(config.llm.temperatures.drafting, 0.9);
        assert_eq!(config.llm.temperatures.formatting, 0.2);
        assert_eq!(config.research.policy, PolicyKind::Keyword);
        assert_eq!(config.research.forced_tool, Some(ToolKind::News));
        assert_eq!(config.research.max_iterations, 3);
    }

    #[test]
    fn test_config_from_file_adapter_section() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("strategist.toml");
        fs::write(
            &config_path,
            r#"
[search.wikipedia]
base_url = "https://de.wikipedia.org"
max_results = 2
"#,
        )
        .unwrap();

        let config = Config::from_file(&config_path).unwrap();

        assert_eq!(config.search.wikipedia.base_url, "https://de.wikipedia.org");
        assert_eq!(config.search.wikipedia.max_results, 2);
        assert!(config.search.wikipedia.api_key.is_empty());
        assert_eq!(config.search.gnews.base_url, "https://gnews.io");
    }

    #[test]
    fn test_config_from_missing_file() {
        let result = Config::from_file(&PathBuf::from("/nonexistent/strategist.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_from_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "llm = [unclosed").unwrap();

        assert!(Config::from_file(&config_path).is_err());
    }

    #[test]
    fn test_missing_credentials() {
        let mut config = Config::default();
        config.llm.api_key = String::new();
        config.search.gnews.api_key = String::new();
        config.search.tavily.api_key = "tvly-key".to_string();

        let missing = config.missing_credentials();
        assert_eq!(missing, vec!["GOOGLE_API_KEY", "GNEWS_API_KEY"]);

        config.llm.provider = LLMProvider::Ollama;
        config.search.gnews.api_key = "gnews-key".to_string();
        assert!(config.missing_credentials().is_empty());
    }

    #[test]
    fn test_missing_credentials_names_provider_key() {
        let mut config = Config::default();
        config.llm.provider = LLMProvider::OpenAI;
        config.llm.api_key = String::new();
        config.search.gnews.api_key = "gnews-key".to_string();
        config.search.tavily.api_key = "tvly-key".to_string();

        assert_eq!(config.missing_credentials(), vec!["OPENAI_API_KEY"]);

        config.llm.provider = LLMProvider::Anthropic;
        assert_eq!(config.missing_credentials(), vec!["ANTHROPIC_API_KEY"]);
    }
}
