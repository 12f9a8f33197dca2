//! Scene Prompt
//!
//! 场景图片提示词组装：固定画风 + 场景动作 + 角色参考 + 一致性要求

use crate::domain::story::CharacterReferenceMap;

/// 固定画风，进程内所有调用完全相同
pub const LOCKED_STYLE: &str = "Children's book cartoon illustration with bright vibrant colors, \
simple shapes, friendly characters, clean compositions, appropriate for all ages, \
consistent character design and proportions";

/// 角色一致性要求
pub const CONSISTENCY_NOTE: &str = "IMPORTANT: Use the character reference guide to ensure \
characters look EXACTLY the same in every scene. Maintain consistent art style throughout all images.";

/// 场景描述为空时的兜底
const FALLBACK_SCENE: &str = "a cheerful scene";

/// 组装场景提示词
///
/// 顺序固定: 画风 → "Scene: ..." → 角色参考（非空时）→ 一致性要求
pub fn compose_scene_prompt(action_description: &str, references: &CharacterReferenceMap) -> String {
    let action = action_description.trim();
    let action = if action.is_empty() {
        FALLBACK_SCENE
    } else {
        action
    };

    let mut parts = vec![format!("Scene: {}", action)];

    if !references.is_empty() {
        let guide = references
            .iter()
            .map(|(name, description)| format!("{} is {}", name, description))
            .collect::<Vec<_>>()
            .join("; ");
        parts.push(format!("Character reference guide: {}", guide));
    }

    format!("{} {}. {}", LOCKED_STYLE, parts.join(" "), CONSISTENCY_NOTE)
}
