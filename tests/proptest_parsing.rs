use pedidobot::text_utils::{chunk_message, MISSING_ANALYSIS};
use pedidobot::{build_prompt, export_docx, parse_form, split_response, PedidoRequest};
use proptest::prelude::*;
use unicode_segmentation::UnicodeSegmentation;

// Free text without the section markers, trimmed and non-empty.
fn field_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9áéíóúñ¿?,. ]{1,40}"
        .prop_map(|s| s.trim().to_string())
        .prop_filter("non-empty", |s| !s.is_empty())
}

proptest! {
    #[test]
    fn prop_prompt_contains_every_input(
        oyente in field_text(),
        accion in field_text(),
        condiciones in field_text(),
        tiempo in field_text(),
        contexto in field_text(),
    ) {
        let req = PedidoRequest::new(&oyente, &accion, &condiciones, &tiempo, &contexto);
        let prompt = build_prompt(&req);
        for value in [&oyente, &accion, &condiciones, &tiempo, &contexto] {
            prop_assert!(prompt.contains(value.as_str()));
        }
    }

    #[test]
    fn prop_split_never_panics(s in "(?s).*") {
        let _ = split_response(&s);
    }

    #[test]
    fn prop_split_round_trip(a in field_text(), b in field_text()) {
        let res = split_response(&format!("{a} SECCION_ANALISIS: {b}"));
        prop_assert_eq!(res.guion, a);
        prop_assert_eq!(res.analisis, b);
    }

    #[test]
    fn prop_split_without_marker(a in field_text()) {
        let res = split_response(&format!("  {a}\n"));
        prop_assert_eq!(res.guion, a);
        prop_assert_eq!(res.analisis, MISSING_ANALYSIS);
    }

    #[test]
    fn prop_parse_form_never_panics(s in "(?s).*") {
        let _ = parse_form(&s);
    }

    #[test]
    fn prop_parse_form_reads_labeled_fields(
        oyente in field_text(),
        tiempo in field_text(),
    ) {
        let req = parse_form(&format!("Oyente: {oyente}\nTiempo: {tiempo}"));
        prop_assert_eq!(req.oyente, oyente);
        prop_assert_eq!(req.tiempo, tiempo);
    }

    #[test]
    fn prop_chunks_reassemble(s in "(?s).{0,300}", limit in 1usize..50) {
        let chunks = chunk_message(&s, limit);
        for chunk in &chunks {
            // A single grapheme wider than the limit is kept whole.
            prop_assert!(
                chunk.chars().count() <= limit || chunk.graphemes(true).count() == 1,
                "chunk {:?} exceeds limit {}",
                chunk,
                limit
            );
        }
        prop_assert_eq!(chunks.concat(), s);
    }

    #[test]
    fn prop_export_is_deterministic(guion in "(?s).{0,200}", analisis in "(?s).{0,200}") {
        let a = export_docx(&guion, &analisis).unwrap();
        let b = export_docx(&guion, &analisis).unwrap();
        prop_assert_eq!(a, b);
    }
}
