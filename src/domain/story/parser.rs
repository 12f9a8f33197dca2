//! Story Document Parser
//!
//! 将清理后的文本解码为 StoryDocument，失败时不返回部分结果

use serde::Deserialize;

use super::document::{Character, Scene, StoryDocument};
use super::errors::StoryParseError;

/// 模型原始 JSON 结构
///
/// 同时接受提示词约定的字段名（story / main_characters）与领域字段名
#[derive(Debug, Deserialize)]
struct RawStoryDocument {
    #[serde(default, rename = "story", alias = "narrative")]
    narrative: Option<String>,

    #[serde(default, rename = "main_characters", alias = "characters")]
    characters: Option<Vec<Character>>,

    #[serde(default)]
    scenes: Option<Vec<RawScene>>,
}

#[derive(Debug, Deserialize)]
struct RawScene {
    #[serde(default)]
    index: Option<u32>,

    #[serde(default)]
    title: String,

    #[serde(default, rename = "description", alias = "action_description")]
    action_description: String,

    #[serde(default)]
    text: String,
}

/// 解析故事文档
///
/// 以下情况返回 `MalformedStoryOutput`:
/// - 文本不是合法 JSON 对象
/// - 既没有 scenes 字段也没有 narrative
///
/// scenes 为空数组时照常返回；场景数量不做校验，缺少 index 的场景按位置补齐（position + 1）
pub fn parse_story_document(text: &str) -> Result<StoryDocument, StoryParseError> {
    if text.trim().is_empty() {
        return Err(StoryParseError::malformed("story output is empty"));
    }

    let raw: RawStoryDocument = serde_json::from_str(text)?;

    let scenes = raw.scenes.map(|scenes| {
        scenes
            .into_iter()
            .enumerate()
            .map(|(position, scene)| Scene {
                index: scene.index.unwrap_or(position as u32 + 1),
                title: scene.title,
                action_description: scene.action_description,
                text: scene.text,
            })
            .collect::<Vec<_>>()
    });

    let narrative = raw.narrative.filter(|n| !n.trim().is_empty());
    if scenes.is_none() && narrative.is_none() {
        return Err(StoryParseError::malformed(
            "story output has neither scenes nor narrative",
        ));
    }

    Ok(StoryDocument::new(
        narrative,
        raw.characters.unwrap_or_default(),
        scenes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROBOT_STORY: &str = r#"{
        "story": "Unit 7 rolled along the rainy streets.",
        "main_characters": [
            {"name": "Unit 7", "description": "Small round silver robot with a cyan eye"},
            {"name": "Lost Kitten", "description": "Tiny orange tabby with white paws"}
        ],
        "scenes": [
            {"index": 1, "title": "The Setup", "description": "Wet city streets at night", "text": "Unit 7 rolled along."},
            {"index": 2, "title": "The Inciting Incident", "description": "A soggy box in an alley", "text": "A faint mew."},
            {"index": 3, "title": "The Climax", "description": "An umbrella over the box", "text": "He shielded the kitten."},
            {"index": 4, "title": "The Resolution", "description": "A warm bakery", "text": "Warm milk for all."}
        ]
    }"#;

    #[test]
    fn test_parse_full_document() {
        let doc = parse_story_document(ROBOT_STORY).unwrap();
        assert_eq!(doc.scene_count(), 4);
        assert_eq!(doc.characters().len(), 2);
        assert_eq!(doc.narrative(), Some("Unit 7 rolled along the rainy streets."));

        let scene = &doc.scenes().unwrap()[2];
        assert_eq!(scene.index, 3);
        assert_eq!(scene.title, "The Climax");
        assert_eq!(scene.action_description, "An umbrella over the box");
    }

    #[test]
    fn test_parse_accepts_domain_field_names() {
        let text = r#"{
            "narrative": "N",
            "characters": [{"name": "Pip", "visual_description": "grey mouse"}],
            "scenes": [{"index": 1, "title": "T", "action_description": "A field", "text": "x"}]
        }"#;
        let doc = parse_story_document(text).unwrap();
        assert_eq!(doc.characters()[0].visual_description, "grey mouse");
        assert_eq!(doc.scenes().unwrap()[0].action_description, "A field");
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = parse_story_document("{\"story\": ").unwrap_err();
        assert!(matches!(err, StoryParseError::MalformedStoryOutput(_)));
    }

    #[test]
    fn test_non_object_is_malformed() {
        assert!(parse_story_document("[1, 2, 3]").is_err());
        assert!(parse_story_document("\"just text\"").is_err());
    }

    #[test]
    fn test_empty_input_is_malformed() {
        assert!(parse_story_document("   ").is_err());
    }

    #[test]
    fn test_missing_scenes_and_narrative_is_malformed() {
        let err = parse_story_document(r#"{"main_characters": []}"#).unwrap_err();
        assert!(err.to_string().contains("neither scenes nor narrative"));
    }

    #[test]
    fn test_narrative_only_is_degraded_mode() {
        let doc = parse_story_document(r#"{"story": "A short tale."}"#).unwrap();
        assert!(doc.scenes().is_none());
        assert_eq!(doc.narrative(), Some("A short tale."));
    }

    #[test]
    fn test_empty_scenes_array_is_accepted() {
        let doc = parse_story_document(r#"{"scenes": []}"#).unwrap();
        assert_eq!(doc.scene_count(), 0);
        assert!(doc.scenes().is_some());
        assert!(doc.narrative().is_none());
    }

    #[test]
    fn test_scene_count_not_enforced() {
        let text = r#"{"scenes": [
            {"index": 1, "title": "a", "description": "", "text": "one"},
            {"index": 2, "title": "b", "description": "", "text": "two"}
        ]}"#;
        let doc = parse_story_document(text).unwrap();
        assert_eq!(doc.scene_count(), 2);
    }

    #[test]
    fn test_missing_index_assigned_positionally() {
        let text = r#"{"scenes": [
            {"title": "a", "text": "one"},
            {"title": "b", "text": "two"},
            {"title": "c", "text": "three"}
        ]}"#;
        let doc = parse_story_document(text).unwrap();
        let indices: Vec<u32> = doc.scenes().unwrap().iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }
}
