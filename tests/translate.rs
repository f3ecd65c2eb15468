//! Translation provider tests.
//!
//! The HTTP tests run the client against a one-shot server on localhost.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use subreflow::{
    DeeplTranslator, Formality, ReflowError, TranslationRequest, Translator,
    translate::{DEEPL_FREE_API_URL, DEEPL_PRO_API_URL},
};

fn proxy_configured() -> bool {
    ["HTTP_PROXY", "HTTPS_PROXY", "ALL_PROXY"]
        .iter()
        .any(|name| {
            std::env::var_os(name).is_some() || std::env::var_os(name.to_lowercase()).is_some()
        })
}

/// Accept one connection, answer it, and hand back the raw request.
fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind listener");
    let url = format!(
        "http://{}/v2/translate",
        listener.local_addr().expect("Failed to read address")
    );

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("Failed to accept");
        let mut reader = BufReader::new(stream.try_clone().expect("Failed to clone stream"));

        let mut request = String::new();
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("Failed to read header");
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().expect("Bad content length");
                }
            }
            let end_of_headers = line == "\r\n" || line.is_empty();
            request.push_str(&line);
            if end_of_headers {
                break;
            }
        }

        let mut body_bytes = vec![0; content_length];
        reader.read_exact(&mut body_bytes).expect("Failed to read body");
        request.push_str(&String::from_utf8_lossy(&body_bytes));

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .expect("Failed to write response");
        stream.flush().expect("Failed to flush response");

        request
    });

    (url, handle)
}

fn request(texts: &[String]) -> TranslationRequest<'_> {
    TranslationRequest {
        texts,
        source_language: "NL",
        target_language: "FR",
        formality: Formality::More,
    }
}

// ── Construction ───────────────────────────────────────────────────

#[test]
fn empty_key_is_rejected() {
    assert!(matches!(
        DeeplTranslator::new(""),
        Err(ReflowError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        DeeplTranslator::new("   "),
        Err(ReflowError::InvalidConfiguration(_))
    ));
}

#[test]
fn endpoint_follows_key_plan() {
    let free = DeeplTranslator::new("abc:fx").expect("Failed to build client");
    assert_eq!(free.api_url(), DEEPL_FREE_API_URL);

    let pro = DeeplTranslator::new("abc").expect("Failed to build client");
    assert_eq!(pro.api_url(), DEEPL_PRO_API_URL);
}

#[test]
fn empty_batch_skips_the_provider() {
    let translator = DeeplTranslator::with_api_url("abc", "http://127.0.0.1:9/unreachable")
        .expect("Failed to build client");

    let translated = translator
        .translate(&request(&[]))
        .expect("Empty batch should succeed");

    assert!(translated.is_empty());
}

// ── HTTP ───────────────────────────────────────────────────────────

#[test]
fn successful_translation() {
    if proxy_configured() {
        eprintln!("Skipping HTTP test: a proxy is configured");
        return;
    }

    let (url, server) = serve_once(
        "200 OK",
        r#"{"translations":[{"detected_source_language":"NL","text":"Bonjour."}]}"#,
    );
    let translator =
        DeeplTranslator::with_api_url("secret-key", &url).expect("Failed to build client");
    let texts = vec!["Goedemorgen.".to_string()];

    let translated = translator
        .translate(&request(&texts))
        .expect("Translation failed");
    let raw_request = server.join().expect("Server thread panicked");

    assert_eq!(translated, ["Bonjour."]);
    assert!(raw_request.starts_with("POST /v2/translate"));
    assert!(
        raw_request
            .lines()
            .any(|line| line.eq_ignore_ascii_case("authorization: DeepL-Auth-Key secret-key")),
        "Missing auth header: {raw_request}",
    );
    assert!(raw_request.contains(r#""text":["Goedemorgen."]"#));
    assert!(raw_request.contains(r#""source_lang":"NL""#));
    assert!(raw_request.contains(r#""target_lang":"FR""#));
    assert!(raw_request.contains(r#""formality":"prefer_more""#));
}

#[test]
fn provider_error_keeps_status_and_payload() {
    if proxy_configured() {
        eprintln!("Skipping HTTP test: a proxy is configured");
        return;
    }

    let (url, server) = serve_once("456 Quota Exceeded", r#"{"message":"Quota exceeded"}"#);
    let translator =
        DeeplTranslator::with_api_url("secret-key", &url).expect("Failed to build client");
    let texts = vec!["Goedemorgen.".to_string()];

    let result = translator.translate(&request(&texts));
    server.join().expect("Server thread panicked");

    match result {
        Err(ReflowError::Provider { status, message }) => {
            assert_eq!(status, 456);
            assert!(message.contains("Quota exceeded"), "Unexpected payload: {message}");
        }
        other => panic!("Expected Provider error, got: {other:?}"),
    }
}

#[test]
fn undecodable_response_is_reported() {
    if proxy_configured() {
        eprintln!("Skipping HTTP test: a proxy is configured");
        return;
    }

    let (url, server) = serve_once("200 OK", r#"{"unexpected":true}"#);
    let translator =
        DeeplTranslator::with_api_url("secret-key", &url).expect("Failed to build client");
    let texts = vec!["Goedemorgen.".to_string()];

    let result = translator.translate(&request(&texts));
    server.join().expect("Server thread panicked");

    assert!(
        matches!(result, Err(ReflowError::ResponseDecode(_))),
        "Expected ResponseDecode, got: {result:?}",
    );
}
