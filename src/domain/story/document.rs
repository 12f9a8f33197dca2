//! Story Context - Story Document
//!
//! 文本模型的结构化输出，解析后只读

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 主要角色
///
/// 模型输出字段为 `name` / `description`，同时兼容 `visual_description`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    #[serde(default)]
    pub name: String,

    /// 外貌描述（颜色、体型、服饰等）
    #[serde(default, rename = "description", alias = "visual_description")]
    pub visual_description: String,
}

impl Character {
    pub fn new(name: impl Into<String>, visual_description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visual_description: visual_description.into(),
        }
    }
}

/// 场景
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scene {
    /// 场景序号，从 1 开始
    pub index: u32,
    pub title: String,
    /// 动作与场景描述，不包含角色外貌
    pub action_description: String,
    /// 该场景的故事正文
    pub text: String,
}

impl Scene {
    pub fn new(
        index: u32,
        title: impl Into<String>,
        action_description: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            index,
            title: title.into(),
            action_description: action_description.into(),
            text: text.into(),
        }
    }

}

/// 故事文档
///
/// `scenes` 为 None 时进入降级模式：只下发 narrative，不生成图片；
/// 空数组同样不生成图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryDocument {
    narrative: Option<String>,
    characters: Vec<Character>,
    scenes: Option<Vec<Scene>>,
}

impl StoryDocument {
    /// 创建文档，场景按序号升序排列（稳定排序）
    pub fn new(
        narrative: Option<String>,
        characters: Vec<Character>,
        scenes: Option<Vec<Scene>>,
    ) -> Self {
        let scenes = scenes.map(|mut s| {
            s.sort_by_key(|scene| scene.index);
            s
        });
        Self {
            narrative,
            characters,
            scenes,
        }
    }

    pub fn narrative(&self) -> Option<&str> {
        self.narrative.as_deref()
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn scenes(&self) -> Option<&[Scene]> {
        self.scenes.as_deref()
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.as_ref().map_or(0, Vec::len)
    }

    /// 构建角色参考表
    pub fn character_references(&self) -> CharacterReferenceMap {
        CharacterReferenceMap::from_characters(&self.characters)
    }
}

/// 角色参考表：name -> 外貌描述
///
/// 每个请求构建一次，用于所有场景的图片提示词，保证角色外观一致
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterReferenceMap(BTreeMap<String, String>);

impl CharacterReferenceMap {
    /// 丢弃名字或描述为空的角色；重名时保留第一个
    pub fn from_characters(characters: &[Character]) -> Self {
        let mut map = BTreeMap::new();
        for character in characters {
            let name = character.name.trim();
            let description = character.visual_description.trim();
            if name.is_empty() || description.is_empty() {
                continue;
            }
            map.entry(name.to_string())
                .or_insert_with(|| description.to_string());
        }
        Self(map)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
