//! Gemini Story Client - 调用 Gemini streamGenerateContent
//!
//! 实现 StoryModelPort，以 SSE 方式接收增量文本
//!
//! Gemini API:
//! POST {api_base}/models/{model}:streamGenerateContent?alt=sse
//! Header: x-goog-api-key
//! Response: text/event-stream，每个 `data:` 是一个 GenerateContentResponse

use async_trait::async_trait;
use futures_util::stream::{self, Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

use crate::application::ports::{
    FragmentStream, StoryModelError, StoryModelPort, StoryModelRequest,
};

/// Gemini 客户端配置
#[derive(Debug, Clone)]
pub struct GeminiStoryClientConfig {
    /// API 基础 URL
    pub api_base: String,
    /// 模型名称
    pub model: String,
    pub api_key: String,
    /// 请求超时时间（秒），包含读取整个流
    pub timeout_secs: u64,
}

impl GeminiStoryClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: api_key.into(),
            timeout_secs: 120,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// 请求体
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

impl From<&StoryModelRequest> for GenerateContentRequest {
    fn from(request: &StoryModelRequest) -> Self {
        Self {
            contents: request
                .messages
                .iter()
                .map(|message| Content {
                    role: Some(message.role.as_str()),
                    parts: vec![Part {
                        text: message.text.clone(),
                    }],
                })
                .collect(),
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: request.system_instruction.clone(),
                }],
            },
            generation_config: GenerationConfig {
                response_mime_type: request.response_mime_type.clone(),
            },
        }
    }
}

/// 流中的单个响应
#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
}

/// SSE 解码器：按空行切分事件，拼接多行 `data:`
#[derive(Debug, Default)]
struct SseDecoder {
    buffer: Vec<u8>,
    /// buffer 中已确认不含分隔符起点的前缀长度
    scanned: usize,
}

impl SseDecoder {
    /// 追加字节，返回已完整的事件数据
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        // 分隔符最长 4 字节，可能跨越上次扫描的末尾
        let mut from = self.scanned.saturating_sub(3);
        while let Some((end, separator)) = Self::boundary(&self.buffer, from) {
            let block: Vec<u8> = self.buffer.drain(..end + separator).collect();
            if let Some(data) = Self::data_of(&block[..end]) {
                events.push(data);
            }
            from = 0;
        }
        self.scanned = self.buffer.len();
        events
    }

    /// 流结束时取出未以空行结尾的最后一个事件
    fn finish(&mut self) -> Option<String> {
        let block = std::mem::take(&mut self.buffer);
        self.scanned = 0;
        Self::data_of(&block)
    }

    /// 从 `from` 起第一个事件分隔符的位置与长度（`\n\n` 或 `\r\n\r\n`）
    fn boundary(buffer: &[u8], from: usize) -> Option<(usize, usize)> {
        (from..buffer.len()).find_map(|i| {
            let rest = &buffer[i..];
            if rest.starts_with(b"\r\n\r\n") {
                Some((i, 4))
            } else if rest.starts_with(b"\n\n") {
                Some((i, 2))
            } else {
                None
            }
        })
    }

    fn data_of(block: &[u8]) -> Option<String> {
        let block = String::from_utf8_lossy(block);
        let lines: Vec<&str> = block
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(|data| data.strip_prefix(' ').unwrap_or(data))
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }
}

/// 解析一个事件；没有文本的事件返回 None
fn decode_event(data: &str) -> Option<Result<String, StoryModelError>> {
    let data = data.trim();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    let chunk: StreamChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(e) => {
            return Some(Err(StoryModelError::InvalidResponse(format!(
                "Failed to parse stream chunk: {}",
                e
            ))))
        }
    };

    if let Some(error) = chunk.error {
        return Some(Err(StoryModelError::ServiceError(match error.code {
            Some(code) => format!("{}: {}", code, error.message),
            None => error.message,
        })));
    }

    let text: String = chunk
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        None
    } else {
        Some(Ok(text))
    }
}

fn map_reqwest_error(e: reqwest::Error) -> StoryModelError {
    if e.is_timeout() {
        StoryModelError::Timeout
    } else if e.is_connect() {
        StoryModelError::NetworkError(format!("Cannot connect to Gemini API: {}", e))
    } else {
        StoryModelError::NetworkError(e.to_string())
    }
}

struct SseState<S> {
    body: S,
    decoder: SseDecoder,
    pending: VecDeque<Result<String, StoryModelError>>,
    finished: bool,
}

/// 把 HTTP 响应体转换为文本片段流
fn fragment_stream<S, B>(body: S) -> FragmentStream
where
    S: Stream<Item = Result<B, reqwest::Error>> + Send + Unpin + 'static,
    B: AsRef<[u8]> + Send,
{
    let state = SseState {
        body,
        decoder: SseDecoder::default(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }

            match state.body.next().await {
                Some(Ok(bytes)) => {
                    let events = state.decoder.push(bytes.as_ref());
                    state
                        .pending
                        .extend(events.iter().filter_map(|data| decode_event(data)));
                }
                Some(Err(e)) => {
                    state.finished = true;
                    state.pending.push_back(Err(map_reqwest_error(e)));
                }
                None => {
                    state.finished = true;
                    if let Some(data) = state.decoder.finish() {
                        state.pending.extend(decode_event(&data));
                    }
                }
            }
        }
    })
    .boxed()
}

/// Gemini 流式文本客户端
pub struct GeminiStoryClient {
    client: Client,
    config: GeminiStoryClientConfig,
}

impl GeminiStoryClient {
    pub fn new(config: GeminiStoryClientConfig) -> Result<Self, StoryModelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoryModelError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl StoryModelPort for GeminiStoryClient {
    async fn generate(&self, request: StoryModelRequest) -> Result<FragmentStream, StoryModelError> {
        let body = GenerateContentRequest::from(&request);

        tracing::debug!(
            url = %self.stream_url(),
            model = %self.config.model,
            messages = body.contents.len(),
            "Sending Gemini stream request"
        );

        let response = self
            .client
            .post(self.stream_url())
            .query(&[("alt", "sse")])
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StoryModelError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        Ok(fragment_stream(response.bytes_stream().boxed()))
    }
}
