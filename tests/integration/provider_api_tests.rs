/*!
 * Integration tests for chat API request and response handling
 */

use anyhow::Result;
use serde_json::json;

use lexitra::pipeline::chunking::wrap_chunk;
use lexitra::pipeline::{PromptBuilder, PromptTemplate};
use lexitra::providers::{ChatApi, Provider};
use lexitra::split::EntrySplitter;
use crate::common;

/// Tests that a fragment prompt reaches the request with documents, rules
/// and the fragment note intact
#[test]
fn test_buildRequest_withFragmentPrompt_shouldCarryDocuments() -> Result<()> {
    // 1. Wrap the Qal stem the way the assembler does before prompting
    let splitter = EntrySplitter::new();
    let fragments = splitter.split_markup(common::ENTRY_23_HTML);
    let (wrapped, _) = wrap_chunk(&fragments[1].content);

    // 2. Build the per-attempt prompt
    let template = PromptTemplate::entry_translator().with_languages("English", "French");
    let prompt = PromptBuilder::new(&template, &wrapped, "Qal. se lamenter Isa 19:8")
        .chunk_mode(true)
        .build();

    assert!(prompt.contains("French edition"));
    assert!(prompt.contains("<descrip>lament</descrip>"), "Original markup should be quoted");
    assert!(prompt.contains("Qal. se lamenter Isa 19:8"), "Translation should be quoted");
    assert!(prompt.contains(">>> ERRATA"), "The errata escape hatch must be stated");
    assert!(prompt.contains("fragment of a larger entry"));

    // 3. The request wraps the prompt as a single user message
    let api = ChatApi::new("http://localhost:1234", "local-model");
    let request = api.build_request(&prompt);
    let value = serde_json::to_value(&request)?;
    assert_eq!(value["model"], "local-model");
    assert_eq!(value["messages"][0]["role"], "user");
    assert!(value["messages"][0]["content"].as_str().unwrap_or("").contains("lament"));
    Ok(())
}

/// Tests the wire shape an OpenAI-compatible server expects
#[test]
fn test_chatRequest_serialization_shouldMatchWireFormat() -> Result<()> {
    let api = ChatApi::new_with_config("http://localhost:1234", "mistral-small", 2048, 3, 100);
    let request = api.build_request("merge this entry");

    let value = serde_json::to_value(&request)?;
    assert_eq!(value["model"], "mistral-small");
    assert_eq!(value["max_tokens"], 2048);
    assert_eq!(value["temperature"], 0.0);
    assert_eq!(value["stream"], false);
    assert_eq!(value["messages"].as_array().map(|m| m.len()), Some(1));
    Ok(())
}

/// Tests parsing a realistic server payload down to the completion text
#[test]
fn test_chatResponse_withServerPayload_shouldParseAndExtract() -> Result<()> {
    let payload = json!({
        "id": "chatcmpl-42",
        "object": "chat.completion",
        "model": "local-model",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": "<think>check the tags first</think>\n<p>pleurer</p>"
            },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 120, "completion_tokens": 8, "total_tokens": 128 }
    })
    .to_string();

    let response: lexitra::providers::chat::ChatResponse = serde_json::from_str(&payload)?;
    assert_eq!(response.content(), "<p>pleurer</p>", "Reasoning blocks are stripped");
    assert_eq!(ChatApi::extract_text(&response), "<p>pleurer</p>");

    let usage = response.usage.as_ref().unwrap();
    assert_eq!(usage.total_tokens, Some(128));
    assert_eq!(response.choices[0].finish_reason.as_deref(), Some("stop"));
    Ok(())
}

/// Tests that a custom prompt template loads from disk and renders
#[test]
fn test_promptTemplate_fromFile_shouldLoadAndRender() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let template_path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "prompt.txt",
        "To {target_language}:\n{{ORIGINAL_HTML}}\n---\n{{FRENCH_TXT}}",
    )?;

    let template = PromptTemplate::from_file(&template_path)?.with_languages("English", "French");
    let prompt = PromptBuilder::new(&template, "<p>mourn</p>", "pleurer").build();

    assert_eq!(prompt, "To French:\n<p>mourn</p>\n---\npleurer");
    Ok(())
}
