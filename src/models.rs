//! Domain models shared between the API client, the reducer, and the UI.
//!
//! `Document` mirrors the server's wire shape; everything else is
//! client-local view state.

use serde::{Deserialize, Serialize};

/// Category label assumed when the server stores a document without one.
pub const DEFAULT_DOC_TYPE: &str = "论证段";

/// Type filter vocabulary. The first entry means "no type filter".
pub const TYPE_FILTERS: &[&str] = &["全部素材", "论证段", "开头段", "结尾段", "名言金句", "人物素材"];

/// Theme filter vocabulary.
pub const THEME_FILTERS: &[&str] = &[
    "青春奋斗", "家国情怀", "科技创新", "责任奉献", "苦难挫折", "文化传承",
    "榜样力量", "公平正义", "生态环保", "多元包容", "人性光辉", "网络时代",
    "自我认知", "人生理想", "工匠精神", "文化自信", "责任担当", "审美境界",
];

/// One stored essay-material entry.
///
/// Owned by the server; the client holds a transient, possibly-stale
/// copy per screen. `date` is opaque display text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    /// Server-generated summary line, display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    /// Category label; may be absent or empty on the wire.
    #[serde(rename = "type", default)]
    pub doc_type: String,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub date: String,
}

impl Document {
    /// Category label with the product default applied.
    pub fn display_type(&self) -> &str {
        if self.doc_type.is_empty() {
            DEFAULT_DOC_TYPE
        } else {
            &self.doc_type
        }
    }

    /// Content preview truncated to at most `max_chars` characters.
    pub fn preview(&self, max_chars: usize) -> String {
        let trimmed = self.content.trim();
        if trimmed.chars().count() <= max_chars {
            return trimmed.to_string();
        }
        let cut: String = trimmed.chars().take(max_chars).collect();
        format!("{}…", cut)
    }
}

/// Chat context. Each mode has an independent history and preset prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    General,
    Analyze,
    Rewrite,
}

const GENERAL_PRESETS: &[&str] = &[
    "帮我把这段素材缩写到100字以内",
    "这段素材有没有相关的反面例子？",
    "翻译成英文",
];

const ANALYZE_PRESETS: &[&str] = &[
    "分析这段素材的论证逻辑",
    "这段素材适合用在什么主题的作文里？",
    "帮我提炼3个适用的人物精神关键词",
    "指出这段文字在修辞上的亮点",
];

const REWRITE_PRESETS: &[&str] = &[
    "把这段话改写成排比句，增强气势",
    "模仿这个风格写一段关于'坚持'的开头",
    "用这段素材作为论据，写一个论证段落",
    "基于此素材出两道作文题目",
];

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::General, Mode::Analyze, Mode::Rewrite];

    /// Wire tag sent to the chat endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::General => "general",
            Mode::Analyze => "analyze",
            Mode::Rewrite => "rewrite",
        }
    }

    /// Display label for tabs and placeholders.
    pub fn label(self) -> &'static str {
        match self {
            Mode::General => "自由对话",
            Mode::Analyze => "深度解析",
            Mode::Rewrite => "仿写指导",
        }
    }

    /// Suggested prompts shown while this mode's history is empty.
    pub fn presets(self) -> &'static [&'static str] {
        match self {
            Mode::General => GENERAL_PRESETS,
            Mode::Analyze => ANALYZE_PRESETS,
            Mode::Rewrite => REWRITE_PRESETS,
        }
    }

    pub fn next(self) -> Mode {
        match self {
            Mode::General => Mode::Analyze,
            Mode::Analyze => Mode::Rewrite,
            Mode::Rewrite => Mode::General,
        }
    }

    pub fn prev(self) -> Mode {
        match self {
            Mode::General => Mode::Rewrite,
            Mode::Analyze => Mode::General,
            Mode::Rewrite => Mode::Analyze,
        }
    }
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One chat message. Immutable once appended to a history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Per-mode chat histories for one document.
///
/// A mode-keyed struct rather than a map keeps the mode set closed:
/// adding a mode fails to compile until every match arm is extended.
/// Created empty when a detail screen mounts, never persisted.
#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    general: Vec<Message>,
    analyze: Vec<Message>,
    rewrite: Vec<Message>,
}

impl ChatHistory {
    pub fn get(&self, mode: Mode) -> &[Message] {
        match mode {
            Mode::General => &self.general,
            Mode::Analyze => &self.analyze,
            Mode::Rewrite => &self.rewrite,
        }
    }

    /// Append-only access; switching modes never clears a history.
    pub fn push(&mut self, mode: Mode, message: Message) {
        let history = match mode {
            Mode::General => &mut self.general,
            Mode::Analyze => &mut self.analyze,
            Mode::Rewrite => &mut self.rewrite,
        };
        history.push(message);
    }

    pub fn len(&self, mode: Mode) -> usize {
        self.get(mode).len()
    }

    pub fn is_empty(&self, mode: Mode) -> bool {
        self.get(mode).is_empty()
    }
}
