/// Declarative heuristic data shared by the extractor, the classifier and
/// the watcher. Everything here is plain data so a host can extend the lists
/// without touching control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    /// Descendants removed before text is extracted.
    pub chrome_selectors: Vec<String>,
    /// Action labels stripped wherever they appear (no word boundaries in CJK).
    pub cjk_action_labels: Vec<String>,
    /// Action labels stripped only when a text node consists of nothing else.
    pub standalone_action_labels: Vec<String>,
    /// Case-insensitive substrings that mark a node as UI chrome.
    pub ui_keywords: Vec<String>,
    pub button_classes: Vec<String>,
    pub link_classes: Vec<String>,
    pub badge_classes: Vec<String>,
    pub icon_classes: Vec<String>,
    pub toolbar_classes: Vec<String>,
    /// Extensions without the leading dot.
    pub file_extensions: Vec<String>,
    pub upload_keywords: Vec<String>,
    pub file_classes: Vec<String>,
    pub file_descendant_selectors: Vec<String>,
    pub user_classes: Vec<String>,
    /// `(attribute, value)` pairs that mark the current user's bubble.
    pub user_attributes: Vec<(String, String)>,
    pub user_parent_classes: Vec<String>,
    pub user_descendant_selectors: Vec<String>,
    pub speaker_prefixes: Vec<String>,
    /// Transcript container candidates, most specific first.
    pub container_selectors: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            chrome_selectors: owned(&[
                "button", ".button", ".btn", "a", ".link", ".badge", ".tag", ".label", ".icon",
                ".svg", "svg", ".toolbar", ".actions", ".controls", ".share", ".copy", ".like",
                ".favorite", ".report", ".delete", ".edit", ".reply", ".more", ".options",
            ]),
            cjk_action_labels: owned(&[
                "分享", "复制", "点赞", "收藏", "举报", "删除", "编辑", "回复", "更多",
            ]),
            standalone_action_labels: owned(&[
                "share", "copy", "like", "reply", "edit", "delete", "more",
            ]),
            ui_keywords: owned(&[
                "分享", "复制", "点赞", "收藏", "举报", "删除", "编辑", "回复", "发送", "提交",
                "取消", "确定", "保存", "下载", "上传", "更多", "更多选项", "展开", "收起",
                "查看", "查看详情", "点击", "share", "copy", "like", "favorite", "report",
                "delete", "edit", "reply", "send", "submit", "cancel", "confirm", "save",
                "download", "upload", "more", "options", "expand", "collapse", "view", "click",
                "tap",
            ]),
            button_classes: owned(&["button", "btn"]),
            link_classes: owned(&["link"]),
            badge_classes: owned(&["badge", "tag", "label"]),
            icon_classes: owned(&["icon", "svg"]),
            toolbar_classes: owned(&["toolbar", "actions", "controls"]),
            file_extensions: owned(&[
                "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "jpg", "jpeg", "png",
                "gif", "bmp", "mp3", "mp4", "avi", "zip", "rar", "7z", "csv", "json", "xml",
                "html", "css", "js", "py", "java", "cpp", "c", "h", "md",
            ]),
            upload_keywords: owned(&["上传", "文件", "附件", "attachment", "upload", "file"]),
            file_classes: owned(&["file", "upload", "attachment", "file-upload"]),
            file_descendant_selectors: owned(&[".file", ".upload", ".attachment"]),
            user_classes: owned(&[
                "user",
                "human",
                "sender-user",
                "user-message",
                "user-msg",
                "message-user",
                "msg-user",
                "user-content",
                "human-content",
            ]),
            user_attributes: vec![
                ("data-role".to_string(), "user".to_string()),
                ("data-sender".to_string(), "user".to_string()),
                ("data-user".to_string(), "true".to_string()),
                ("role".to_string(), "user".to_string()),
            ],
            user_parent_classes: owned(&["user", "human"]),
            user_descendant_selectors: owned(&[
                ".user",
                ".human",
                ".sender-user",
                ".user-avatar",
                ".user-icon",
                ".user-content",
            ]),
            speaker_prefixes: owned(&["我:", "用户:", "你:", "我：", "用户：", "你："]),
            container_selectors: owned(&[
                ".chat-container",
                ".message-list",
                ".conversation-container",
                ".dialog-container",
                ".chat-content",
                ".message-content",
                ".conversation-content",
                ".dialog-content",
                ".chat-history",
                ".message-history",
                ".messages",
                "#chat-content",
                "#message-list",
                "[class*=\"chat\"]",
                "[class*=\"message\"]",
                "[class*=\"dialog\"]",
            ]),
        }
    }
}
