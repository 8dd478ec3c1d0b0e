pub mod context;

use crate::llm::{ChatMessage, ChatProvider, ChatRequest};
use crate::models::ErrorHit;
use crate::search::{SearchOptions, SearchService};

/// Matches handed to the model as context per query.
pub const SEARCH_TOP: usize = 3;
/// Output bound for one generated reply.
pub const MAX_REPLY_TOKENS: i32 = 1000;
pub const REPLY_TEMPERATURE: f64 = 0.7;

const PERSONA_PROMPT: &str = "당신은 AIRA 이상징후 현황 조회 시스템의 AI 어시스턴트입니다.
MSA 환경에서 핸드폰 개통(신규개통, 번호이동, 기기변경) 시 발생하는 에러들에 대해 전문적으로 답변합니다.

사용자의 질문에 대해 다음과 같이 답변해주세요:
1. 문제 상황 분석
2. 가능한 원인 설명
3. 단계별 해결 방법 제시
4. 관련 시스템 상태 안내
5. 예방 조치 안내

답변은 친근하고 이해하기 쉽게 작성해주세요.";

#[derive(Debug, Clone)]
pub struct PipelineReply {
    pub reply: String,
    pub matches: Vec<ErrorHit>,
}

/// Run one user query through retrieval and generation.
///
/// A search failure degrades to zero matches (the model answers ungrounded);
/// a generation failure becomes an inline error reply. Neither propagates.
pub async fn answer_query(
    search: &dyn SearchService,
    llm: &dyn ChatProvider,
    query: &str,
) -> PipelineReply {
    let matches = match search
        .search(
            query,
            SearchOptions {
                top: SEARCH_TOP,
                select: None,
                include_total_count: true,
            },
        )
        .await
    {
        Ok(page) => page.hits,
        Err(e) => {
            tracing::warn!("search failed, answering without context: {}", e);
            Vec::new()
        }
    };

    let context = context::build_context(&matches);
    let system_prompt = format!("{}\n{}\n", PERSONA_PROMPT, context);

    let request = ChatRequest::new(vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user(query),
    ])
    .with_sampling(REPLY_TEMPERATURE, MAX_REPLY_TOKENS);

    let reply = match llm.chat(request).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("chat completion failed: {}", e);
            format!("응답 생성 중 오류가 발생했습니다: {}", e)
        }
    };

    PipelineReply { reply, matches }
}
