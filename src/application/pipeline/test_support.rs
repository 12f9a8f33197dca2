//! 测试用端口实现

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::application::events::StoryEvent;
use crate::application::ports::{
    Capability, ChannelClosed, DeliveryChannel, FragmentStream, ImageModelError, ImageModelPort,
    ImageModelRequest, ObjectStoragePort, RawImage, StorageError, StoryModelError,
    StoryModelPort, StoryModelRequest,
};
use crate::domain::story::chunk_text;

/// 四个场景、两个角色的故事
pub const FOUR_SCENE_STORY: &str = r#"{
    "story": "Unit 7 rolled along the rainy streets and found a friend.",
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

/// 1x1 PNG 的前几个字节即可
const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// 按脚本返回片段的文本模型
pub struct ScriptedStoryModel {
    fragments: Vec<String>,
    failure: Mutex<Option<StoryModelError>>,
    requests: Mutex<Vec<StoryModelRequest>>,
}

impl ScriptedStoryModel {
    pub fn fragments<I, S>(fragments: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
            failure: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// 把完整文档切成多个片段
    pub fn from_document(document: &str) -> Arc<Self> {
        Self::fragments(chunk_text(document, 64))
    }

    /// 先返回一个片段，再返回错误
    pub fn failing_midway(fragment: &str, error: StoryModelError) -> Arc<Self> {
        Arc::new(Self {
            fragments: vec![fragment.to_string()],
            failure: Mutex::new(Some(error)),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn capability(self: &Arc<Self>) -> Capability<dyn StoryModelPort> {
        Capability::available(self.clone() as Arc<dyn StoryModelPort>)
    }

    pub fn last_request(&self) -> Option<StoryModelRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl StoryModelPort for ScriptedStoryModel {
    async fn generate(&self, request: StoryModelRequest) -> Result<FragmentStream, StoryModelError> {
        self.requests.lock().unwrap().push(request);

        let mut items: Vec<Result<String, StoryModelError>> =
            self.fragments.iter().cloned().map(Ok).collect();
        if let Some(error) = self.failure.lock().unwrap().take() {
            items.push(Err(error));
        }
        Ok(stream::iter(items).boxed())
    }
}

/// 按脚本返回结果的图片模型；脚本用完后每次返回一张 PNG
pub struct ScriptedImageModel {
    script: Mutex<VecDeque<Result<Vec<RawImage>, ImageModelError>>>,
    requests: Mutex<Vec<ImageModelRequest>>,
}

impl ScriptedImageModel {
    pub fn scripted(script: Vec<Result<Vec<RawImage>, ImageModelError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn always_one_png() -> Arc<Self> {
        Self::scripted(Vec::new())
    }

    pub fn capability(self: &Arc<Self>) -> Capability<dyn ImageModelPort> {
        Capability::available(self.clone() as Arc<dyn ImageModelPort>)
    }

    pub fn requests(&self) -> Vec<ImageModelRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageModelPort for ScriptedImageModel {
    async fn generate(&self, request: ImageModelRequest) -> Result<Vec<RawImage>, ImageModelError> {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(vec![RawImage::png(PNG_BYTES.to_vec())]))
    }
}

/// 记录上传对象名的对象存储
pub struct ScriptedStorage {
    bucket: String,
    failure: Option<String>,
    keys: Mutex<Vec<String>>,
}

impl ScriptedStorage {
    pub fn succeeding(bucket: &str) -> Arc<Self> {
        Arc::new(Self {
            bucket: bucket.to_string(),
            failure: None,
            keys: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            bucket: String::new(),
            failure: Some(reason.to_string()),
            keys: Mutex::new(Vec::new()),
        })
    }

    pub fn capability(self: &Arc<Self>) -> Capability<dyn ObjectStoragePort> {
        Capability::available(self.clone() as Arc<dyn ObjectStoragePort>)
    }

    pub fn uploaded_keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStoragePort for ScriptedStorage {
    async fn upload(&self, key: &str, _bytes: &[u8], _content_type: &str) -> Result<String, StorageError> {
        self.keys.lock().unwrap().push(key.to_string());
        match &self.failure {
            Some(reason) => Err(StorageError::ServiceError(reason.clone())),
            None => Ok(format!("https://storage.googleapis.com/{}/{}", self.bucket, key)),
        }
    }
}

/// 记录事件的投递通道，可在 N 个事件后模拟断开
pub struct RecordingChannel {
    events: Mutex<Vec<StoryEvent>>,
    close_after: Option<usize>,
}

impl RecordingChannel {
    pub fn open() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            close_after: None,
        }
    }

    pub fn closing_after(count: usize) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            close_after: Some(count),
        }
    }

    pub fn events(&self) -> Vec<StoryEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(StoryEvent::kind).collect()
    }
}

#[async_trait]
impl DeliveryChannel for RecordingChannel {
    async fn send(&self, event: StoryEvent) -> Result<(), ChannelClosed> {
        let mut events = self.events.lock().unwrap();
        if self.close_after.is_some_and(|limit| events.len() >= limit) {
            return Err(ChannelClosed);
        }
        events.push(event);
        Ok(())
    }
}
