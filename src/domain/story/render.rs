//! Story Text Rendering
//!
//! 将 StoryDocument 重新序列化为前端展示文本

use super::document::StoryDocument;

/// 场景标记，例如 `[SCENE 1]`
pub fn scene_marker(index: u32) -> String {
    format!("[SCENE {}]", index)
}

/// 生成展示文本
///
/// 有场景时按序号升序拼接 `[SCENE n]\n{text}`，块之间空一行；
/// 没有场景（或场景为空数组）时原样返回 narrative
pub fn render_story_text(document: &StoryDocument) -> String {
    match document.scenes() {
        Some(scenes) if !scenes.is_empty() => {
            let mut out = String::new();
            for scene in scenes {
                out.push_str(&scene_marker(scene.index));
                out.push('\n');
                out.push_str(&scene.text);
                out.push_str("\n\n");
            }
            out.trim_end().to_string()
        }
        _ => document.narrative().unwrap_or_default().to_string(),
    }
}

/// 按字符数切分文本（不会切断 UTF-8 字符）
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    if max_chars == 0 {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (offset, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..offset]);
            start = offset;
            count = 0;
        }
        count += 1;
    }
    chunks.push(&text[start..]);
    chunks
}
