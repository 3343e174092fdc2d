use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use serde_json::{Value, json};
use studyguide::{
    api::create_router,
    generation::ExtractiveClient,
    processing::{
        GuideRequest, GuideSettings, QuestionOptions, QuestionType, StudyGuideService,
        SummaryOptions,
    },
    render::render_text,
};
use tower::ServiceExt;

const LECTURE: &str = "Photosynthesis is the process by which plants convert light into chemical energy. \
    The rate of photosynthesis increases with light intensity up to a saturation point. \
    Chlorophyll absorbs light most strongly in the blue and red parts of the spectrum. \
    Carbon dioxide concentration in the atmosphere is roughly 420 parts per million. \
    Stomata regulate gas exchange and water loss through the surface of the leaf.";

fn service(settings: GuideSettings) -> Arc<StudyGuideService> {
    Arc::new(StudyGuideService::with_client(
        Arc::new(ExtractiveClient::new()),
        settings,
    ))
}

fn seeded() -> GuideSettings {
    GuideSettings {
        seed: Some(2024),
        ..GuideSettings::default()
    }
}

fn all_types() -> Vec<String> {
    QuestionType::ALL
        .iter()
        .map(|kind| kind.as_str().to_string())
        .collect()
}

#[tokio::test]
async fn every_type_produces_well_formed_sections() {
    let guide = service(seeded())
        .generate(GuideRequest {
            filename: "photosynthesis.pdf".into(),
            text: LECTURE.into(),
            selected_types: all_types(),
        })
        .await
        .expect("guide generated");

    assert_eq!(guide.selected_types, QuestionType::ALL.to_vec());
    assert_eq!(guide.questions.len(), 6);
    for section in &guide.questions {
        let expected = match section.question_type {
            QuestionType::FillBlank => 5,
            _ => 7,
        };
        assert_eq!(section.questions.len(), expected, "{}", section.question_type);
        for record in &section.questions {
            assert!(record.question.ends_with(['.', '?', '!']));
            assert!(!record.answer.is_empty());
        }
    }
    assert_eq!(guide.total_questions, 5 * 7 + 5);

    let mcq = &guide.questions[3];
    for record in &mcq.questions {
        let options = record.options.as_ref().expect("mcq options");
        assert_eq!(options.len(), 4);
        assert!(
            options
                .iter()
                .any(|option| option.starts_with(&format!("{})", record.answer)))
        );
    }

    let true_false = &guide.questions[5];
    for record in &true_false.questions {
        assert!(record.answer == "True" || record.answer == "False");
        assert!(record.explanation.is_some());
    }
}

#[tokio::test]
async fn shuffled_choices_still_key_the_correct_option() {
    let settings = GuideSettings {
        questions: QuestionOptions {
            shuffle_choices: true,
            ..QuestionOptions::default()
        },
        ..seeded()
    };
    let guide = service(settings)
        .generate(GuideRequest {
            filename: "photosynthesis.pdf".into(),
            text: LECTURE.into(),
            selected_types: vec!["mcq".into()],
        })
        .await
        .expect("guide generated");

    for record in &guide.questions[0].questions {
        let options = record.options.as_ref().expect("mcq options");
        let keyed = options
            .iter()
            .find(|option| option.starts_with(&format!("{})", record.answer)))
            .expect("answer names an option");
        assert!(keyed.contains("Photosynthesis is the process"));
    }
}

#[tokio::test]
async fn summary_falls_back_to_filler_without_generation() {
    let settings = GuideSettings {
        summary: SummaryOptions {
            max_chunks: 5,
            target_words: 500,
        },
        ..seeded()
    };
    let service = service(settings);
    let guide = service
        .generate(GuideRequest {
            filename: "photosynthesis.pdf".into(),
            text: LECTURE.into(),
            selected_types: vec!["theoretical".into()],
        })
        .await
        .expect("guide generated");

    assert!(guide.summary.starts_with("Photosynthesis is the process"));
    assert!(guide.summary.contains("important academic content"));
    assert_eq!(service.metrics_snapshot().filler_summaries, 1);
}

#[tokio::test]
async fn rendered_guide_lists_sections_in_request_order() {
    let guide = service(seeded())
        .generate(GuideRequest {
            filename: "photosynthesis.pdf".into(),
            text: LECTURE.into(),
            selected_types: vec!["truefalse".into(), "numerical".into()],
        })
        .await
        .expect("guide generated");

    let document = render_text(&guide);
    let true_false = document.find("TRUE/FALSE QUESTIONS").expect("tf section");
    let numerical = document.find("NUMERICAL PROBLEMS").expect("numerical section");
    assert!(true_false < numerical);
    assert!(document.contains("Total Questions: 14"));
    assert!(document.contains("Calculate the key quantity"));
}

#[tokio::test]
async fn http_flow_generates_then_downloads() {
    let service = service(seeded());
    let app = create_router(service.clone(), 1024 * 1024);

    let payload = json!({
        "filename": "photosynthesis.pdf",
        "text": LECTURE,
        "selectedTypes": ["mcq", "truefalse"]
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/generate/text")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let guide: Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(guide["totalQuestions"], 14);
    let id = guide["id"].as_u64().expect("numeric id");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/download/{id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let document = String::from_utf8(body.to_vec()).expect("utf-8 document");
    assert!(document.contains("Source Document: photosynthesis.pdf"));
    assert!(document.contains("MULTIPLE CHOICE QUESTIONS"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let metrics: Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(metrics["guides_generated"], 1);
    assert_eq!(metrics["questions_generated"], 14);
}

/// Single-page PDF with one line of Helvetica text, with a correct xref table.
fn text_pdf(text: &str) -> String {
    let content = format!("BT /F1 10 Tf 36 720 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>".to_string(),
        format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", index + 1));
    }
    let xref = pdf.len();
    pdf.push_str(&format!(
        "xref\n0 {}\n0000000000 65535 f \n",
        objects.len() + 1
    ));
    for offset in offsets {
        pdf.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
        objects.len() + 1
    ));
    pdf
}

#[tokio::test]
async fn pdf_upload_generates_guide() {
    let boundary = "flow-boundary";
    let pdf = text_pdf(LECTURE);
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"selectedTypes\"\r\n\r\n{{\"selectedTypes\":[\"theoretical\",\"truefalse\"]}}\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"pdfFile\"; filename=\"lecture.pdf\"\r\nContent-Type: application/pdf\r\n\r\n{pdf}\r\n\
         --{boundary}--\r\n"
    );
    let service = service(seeded());
    let response = create_router(service.clone(), 1024 * 1024)
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/generate")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let guide: Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(guide["filename"], "lecture.pdf");
    assert_eq!(guide["selectedTypes"], json!(["theoretical", "truefalse"]));
    assert_eq!(guide["totalQuestions"], 14);
    assert!(
        guide["summary"]
            .as_str()
            .expect("summary text")
            .contains("Photosynthesis")
    );
    assert_eq!(service.metrics_snapshot().guides_generated, 1);
}

#[tokio::test]
async fn short_documents_are_rejected_over_http() {
    let app = create_router(service(seeded()), 1024 * 1024);
    let payload = json!({ "text": "Too short to study.", "selectedTypes": ["mcq"] });
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/generate/text")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json: Value = serde_json::from_slice(&body).expect("json body");
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .contains("insufficient extractable text")
    );
}
