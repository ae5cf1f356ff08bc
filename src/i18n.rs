use serde::{Deserialize, Serialize};

/// 帖子输出语言
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetLanguage {
    #[serde(rename = "en")]
    #[default]
    English,
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "es")]
    Spanish,
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetLanguage::English => write!(f, "en"),
            TargetLanguage::Chinese => write!(f, "zh"),
            TargetLanguage::Japanese => write!(f, "ja"),
            TargetLanguage::German => write!(f, "de"),
            TargetLanguage::French => write!(f, "fr"),
            TargetLanguage::Spanish => write!(f, "es"),
        }
    }
}

impl std::str::FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" | "英文" => Ok(TargetLanguage::English),
            "zh" | "chinese" | "中文" => Ok(TargetLanguage::Chinese),
            "ja" | "japanese" | "日本語" | "日文" => Ok(TargetLanguage::Japanese),
            "de" | "german" | "deutsch" | "德文" => Ok(TargetLanguage::German),
            "fr" | "french" | "français" | "法文" => Ok(TargetLanguage::French),
            "es" | "spanish" | "español" | "西班牙文" => Ok(TargetLanguage::Spanish),
            _ => Err(format!("Unknown target language: {}", s)),
        }
    }
}

impl TargetLanguage {
    /// 获取语言的描述性名称
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetLanguage::English => "English",
            TargetLanguage::Chinese => "中文",
            TargetLanguage::Japanese => "日本語",
            TargetLanguage::German => "Deutsch",
            TargetLanguage::French => "Français",
            TargetLanguage::Spanish => "Español",
        }
    }

    /// 追加到各阶段系统提示词末尾的语言指令
    pub fn prompt_instruction(&self) -> &'static str {
        match self {
            TargetLanguage::English => {
                "Write all of your output in English, keeping the tone professional and easy to read."
            }
            TargetLanguage::Chinese => "请使用中文输出全部内容，保持专业、自然、易读的表达。",
            TargetLanguage::Japanese => {
                "すべての出力を日本語で書いてください。プロフェッショナルで読みやすい表現を心がけてください。"
            }
            TargetLanguage::German => {
                "Verfassen Sie die gesamte Ausgabe auf Deutsch, professionell und leicht verständlich."
            }
            TargetLanguage::French => {
                "Rédigez l'ensemble de la réponse en français, avec un ton professionnel et facile à lire."
            }
            TargetLanguage::Spanish => {
                "Escribe toda la respuesta en español, con un tono profesional y fácil de leer."
            }
        }
    }

    /// 最终帖子的输出文件名
    pub fn post_filename(&self) -> String {
        match self {
            TargetLanguage::English => "post.md".to_string(),
            other => format!("post.{}.md", other),
        }
    }
}
