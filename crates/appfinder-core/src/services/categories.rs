use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{FinderError, FinderResult};

/// A use-case cluster: multilingual keywords plus well-known apps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub keywords: Vec<String>,
    pub common_apps: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Official download pages keyed by app name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub official_urls: BTreeMap<String, String>,
}

impl Category {
    /// Keyword containment against an already lowercased query
    fn matches_lowercase(&self, query_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|kw| query_lower.contains(&kw.to_lowercase()))
    }

    /// Description, or the id when the category has none
    pub fn label(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.id)
    }

    pub fn official_url(&self, app_name: &str) -> Option<&str> {
        self.official_urls.get(app_name).map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "category")]
    categories: Vec<Category>,
}

/// Ordered, read-only category reference table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

static BUILTIN: Lazy<CategoryTable> = Lazy::new(|| CategoryTable {
    categories: BUILTIN_CATEGORIES
        .iter()
        .map(|(id, keywords, common_apps, description)| Category {
            id: id.to_string(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            common_apps: common_apps.iter().map(|s| s.to_string()).collect(),
            description: Some(description.to_string()),
            official_urls: BTreeMap::new(),
        })
        .collect(),
});

impl CategoryTable {
    /// Build a table, rejecting empty or duplicate ids
    pub fn new(categories: Vec<Category>) -> FinderResult<Self> {
        let mut seen = HashSet::new();
        for category in &categories {
            if category.id.trim().is_empty() {
                return Err(FinderError::Catalog("category with empty id".to_string()));
            }
            if !seen.insert(category.id.as_str()) {
                return Err(FinderError::Catalog(format!(
                    "duplicate category id: {}",
                    category.id
                )));
            }
        }
        Ok(Self { categories })
    }

    /// The built-in table, built once per process
    pub fn builtin() -> &'static CategoryTable {
        &BUILTIN
    }

    pub fn from_toml_str(content: &str) -> FinderResult<Self> {
        let file: CatalogFile =
            toml::from_str(content).map_err(|e| FinderError::Catalog(e.to_string()))?;
        Self::new(file.categories)
    }

    pub fn load_from(path: &Path) -> FinderResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FinderError::Catalog(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories whose keywords appear in the query, in table order
    pub fn matching(&self, query: &str) -> impl Iterator<Item = &Category> {
        let query_lower = query.to_lowercase();
        self.categories
            .iter()
            .filter(move |c| c.matches_lowercase(&query_lower))
    }

    /// Ids of the categories whose keywords appear in the query, in table order
    pub fn find_matching_categories(&self, query: &str) -> Vec<String> {
        self.matching(query).map(|c| c.id.clone()).collect()
    }

    /// Common apps of every matching category, first-seen order, no repeats
    pub fn common_apps_for_query(&self, query: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut apps = Vec::new();
        for category in self.matching(query) {
            for app in &category.common_apps {
                if seen.insert(app.as_str()) {
                    apps.push(app.clone());
                }
            }
        }
        apps
    }
}

type CategoryRow = (
    &'static str,
    &'static [&'static str],
    &'static [&'static str],
    &'static str,
);

const BUILTIN_CATEGORIES: &[CategoryRow] = &[
    (
        "browser",
        &["browser", "web", "internet", "ブラウザ", "インターネット", "웹", "浏览器", "navegador", "navigateur"],
        &["Google Chrome", "Safari", "Firefox", "Brave", "Microsoft Edge", "Arc", "Opera", "Vivaldi", "DuckDuckGo"],
        "Web browsers",
    ),
    (
        "email",
        &["mail", "email", "e-mail", "メール", "이메일", "邮件", "correo", "courrier", "messaging", "メッセージ"],
        &["Mail", "Thunderbird", "Spark", "Airmail", "Outlook", "Canary Mail", "MailMate", "Postbox"],
        "Email clients",
    ),
    (
        "imageEdit",
        &["photo", "image", "edit", "画像", "写真", "編集", "사진", "图片", "照片", "foto", "imagen", "photoshop"],
        &["Adobe Photoshop", "Pixelmator Pro", "Affinity Photo", "GIMP", "Acorn", "Sketch", "Figma", "Canva"],
        "Image and photo editors",
    ),
    (
        "videoEdit",
        &[
            "video", "movie", "edit", "動画", "ビデオ", "영상", "视频", "película", "vidéo", "film", "premiere",
            "final cut",
        ],
        &["Final Cut Pro", "Adobe Premiere Pro", "DaVinci Resolve", "iMovie", "ScreenFlow", "Camtasia", "HandBrake"],
        "Video editors",
    ),
    (
        "code",
        &[
            "code", "editor", "ide", "programming", "develop", "コード", "エディタ", "開発", "코드", "编辑器", "开发",
            "código", "développement", "vscode", "vim",
        ],
        &[
            "Visual Studio Code", "Xcode", "Sublime Text", "IntelliJ IDEA", "WebStorm", "PyCharm", "Android Studio",
            "Atom", "Nova", "BBEdit", "Cursor", "Zed",
        ],
        "Code editors and IDEs",
    ),
    (
        "terminal",
        &[
            "terminal", "console", "command", "shell", "ターミナル", "コンソール", "터미널", "终端", "命令", "consola",
            "iterm", "warp",
        ],
        &["Terminal", "iTerm", "Warp", "Hyper", "Alacritty", "Kitty", "WezTerm"],
        "Terminal emulators",
    ),
    (
        "music",
        &["music", "audio", "player", "音楽", "오디오", "音乐", "música", "musique", "spotify", "apple music"],
        &["Music", "Spotify", "Apple Music", "VLC", "Audirvana", "Vox", "Swinsian"],
        "Music players",
    ),
    (
        "notes",
        &["note", "memo", "markdown", "メモ", "노트", "笔记", "备忘录", "nota", "notion", "obsidian", "bear"],
        &["Notes", "Bear", "Notion", "Obsidian", "Evernote", "OneNote", "Typora", "Craft", "Ulysses"],
        "Note-taking apps",
    ),
    (
        "design",
        &["design", "graphic", "デザイン", "디자인", "设计", "diseño", "conception", "figma", "sketch", "illustrator"],
        &["Figma", "Sketch", "Adobe Illustrator", "Affinity Designer", "Canva", "Inkscape"],
        "Design tools",
    ),
    (
        "chat",
        &["chat", "message", "チャット", "메시지", "聊天", "mensaje", "slack", "discord", "telegram", "whatsapp"],
        &["Slack", "Discord", "Telegram", "WhatsApp", "Messages", "Microsoft Teams", "Zoom"],
        "Chat and messaging apps",
    ),
    (
        "productivity",
        &[
            "productivity", "task", "todo", "生産性", "タスク", "생산성", "任务", "tarea", "productivité", "things",
            "omnifocus",
        ],
        &["Things", "OmniFocus", "Todoist", "TickTick", "Reminders", "Notion", "Trello"],
        "Productivity and task management",
    ),
    (
        "pdf",
        &["pdf", "reader", "preview", "ピーディーエフ", "阅读", "lector"],
        &["Preview", "Adobe Acrobat", "PDF Expert", "Skim", "PDFelement"],
        "PDF readers and editors",
    ),
    (
        "calendar",
        &["calendar", "schedule", "カレンダー", "스케줄", "日历", "calendario", "calendrier", "fantastical"],
        &["Calendar", "Fantastical", "BusyCal", "Cron", "Amie"],
        "Calendar apps",
    ),
    (
        "fileManager",
        &["file", "finder", "manager", "ファイル", "파일", "文件", "archivo", "fichier", "path finder", "forklift"],
        &["Finder", "Path Finder", "Forklift", "Commander One", "ForkLift"],
        "File managers",
    ),
    (
        "screenshot",
        &[
            "screenshot", "capture", "screen", "スクリーンショット", "스크린샷", "截图", "captura", "cleanshot",
            "snagit",
        ],
        &["CleanShot X", "Snagit", "Xnapper", "Screenshot", "Monosnap"],
        "Screenshot and screen capture tools",
    ),
    (
        "password",
        &[
            "password", "vault", "パスワード", "비밀번호", "密码", "contraseña", "mot de passe", "1password", "bitwarden",
        ],
        &["1Password", "Bitwarden", "LastPass", "Dashlane", "KeePassXC"],
        "Password managers",
    ),
];
