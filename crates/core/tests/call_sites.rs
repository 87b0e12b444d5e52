use arkres_core::parser::{CallAnalysis, DeclarationOrigin, SymbolResolver, find_calls, find_global_calls};
use std::path::{Path, PathBuf};

fn texts(source: &str) -> Vec<String> {
    find_calls(source, "$r")
        .unwrap()
        .into_iter()
        .map(|call| call.argument_text)
        .collect()
}

#[test]
fn test_plain_calls() {
    let source = r#"
export function build() {
  Text($r('app.string.app_name'))
    .fontColor($r("app.color.primary_color"));
}
"#;
    assert_eq!(texts(source), vec!["app.string.app_name", "app.color.primary_color"]);
}

#[test]
fn test_shadowed_by_import() {
    assert!(texts("import { $r } from './res';\n$r('app.color.a');").is_empty());
    assert!(texts("import { res as $r } from './res';\n$r('app.color.a');").is_empty());
    assert!(texts("import $r from './res';\n$r('app.color.a');").is_empty());
    // the alias is what gets bound
    assert_eq!(texts("import { $r as res } from './res';\n$r('app.color.a');").len(), 1);
}

#[test]
fn test_shadowed_by_local_declarations() {
    assert!(texts("const $r = (s: string) => s;\n$r('app.color.a');").is_empty());
    assert!(texts("function $r(s: string) { return s; }\n$r('app.color.a');").is_empty());
    assert!(texts("declare function $r(s: string): void;\n$r('app.color.a');").is_empty());
    assert!(texts("class $r {}\n$r('app.color.a');").is_empty());
}

#[test]
fn test_shadowing_applies_to_the_whole_file() {
    // even a declaration after the call, or in a nested scope, disables the file
    assert!(texts("$r('app.color.a');\nlet $r = null;").is_empty());
    assert!(texts("$r('app.color.a');\nfunction f() { const $r = 1; }").is_empty());
}

#[test]
fn test_template_literals() {
    assert_eq!(texts("$r(`app.color.a`)"), texts("$r('app.color.a')"));

    let calls = find_calls("const n = 'a';\n$r(`app.color.${n}`);", "$r").unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].argument_text, "");
    assert!(!calls[0].literal);
}

#[test]
fn test_missing_and_non_literal_arguments() {
    let calls = find_calls("$r();\n$r(name);\n$r(42);", "$r").unwrap();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|call| call.argument_text.is_empty() && !call.literal));

    // without arguments the range covers the parentheses
    let range = calls[0].argument_range;
    assert_eq!((range.start_line, range.start_col, range.end_col), (0, 2, 4));
    assert_eq!(calls[1].argument_range.start_line, 1);
}

#[test]
fn test_escapes_decoded() {
    assert_eq!(texts(r"$r('app.string.it\'s')"), vec!["app.string.it's"]);
    assert_eq!(texts(r#"$r("app.string.\u0061b")"#), vec!["app.string.ab"]);
}

#[test]
fn test_other_identifier() {
    let calls = find_calls("$rawfile('data.txt'); $r('app.color.a');", "$rawfile").unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].argument_text, "data.txt");
}

struct MockResolver {
    result: Result<Vec<PathBuf>, String>,
}

impl SymbolResolver for MockResolver {
    fn declarations(
        &self,
        _file: &Path,
        _name: &str,
        _offset: usize,
    ) -> Result<Vec<DeclarationOrigin>, Box<dyn std::error::Error + Send + Sync>> {
        match &self.result {
            Ok(files) => Ok(files.iter().cloned().map(|file| DeclarationOrigin { file }).collect()),
            Err(e) => Err(e.clone().into()),
        }
    }
}

#[test]
fn test_strict_variant() {
    let source = "$r('app.color.a');";
    let file = Path::new("/p/Index.ets");

    let analysis = find_global_calls(source, "$r", file, None).unwrap();
    assert!(matches!(analysis, CallAnalysis::SyntacticOnly(ref calls) if calls.len() == 1));

    let global = MockResolver {
        result: Ok(vec![PathBuf::from("/sdk/global.d.ts")]),
    };
    let analysis = find_global_calls(source, "$r", file, Some(&global)).unwrap();
    assert!(matches!(analysis, CallAnalysis::Resolved(ref calls) if calls.len() == 1));

    let unresolved = MockResolver { result: Ok(Vec::new()) };
    let analysis = find_global_calls(source, "$r", file, Some(&unresolved)).unwrap();
    assert_eq!(analysis.calls().len(), 1);

    let local = MockResolver {
        result: Ok(vec![PathBuf::from("/sdk/global.d.ts"), file.to_path_buf()]),
    };
    let analysis = find_global_calls(source, "$r", file, Some(&local)).unwrap();
    assert!(matches!(analysis, CallAnalysis::Resolved(ref calls) if calls.is_empty()));

    let failing = MockResolver {
        result: Err("checker unavailable".to_string()),
    };
    let analysis = find_global_calls(source, "$r", file, Some(&failing)).unwrap();
    assert_eq!(analysis.into_calls().len(), 1);
}
