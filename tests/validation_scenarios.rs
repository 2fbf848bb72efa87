use formgen::prelude::*;
use serde_json::json;

fn posts_naming() -> serde_json::Value {
    json!({
        "Users_1_000___": "Posts",
        "users_2_000___": "posts",
        "User_3_000___": "Post",
        "user_4_000___": "post"
    })
}

#[test]
fn test_format_valid_template_two_space_indent() {
    let text = json!({
        "schema": { "title": "STRING", "age": "INTNUMBER#readonly" },
        "namingConvention": posts_naming()
    })
    .to_string();

    let formatted = format_text(&text).expect("valid template formats");
    assert!(formatted.starts_with("{\n  \"schema\": {\n    \"title\": \"STRING\""));
    assert!(formatted.contains("\n    \"age\": \"INTNUMBER#readonly\""));
}

#[test]
fn test_misspelled_tag_fails_save_and_format() {
    let text = json!({
        "uid": "000",
        "schema": { "title": "STRNG" },
        "namingConvention": posts_naming()
    })
    .to_string();

    let mut editor = TemplateEditor::new(GeneratorConfig::default());
    editor.set_text(text.clone());
    let err = editor.save().unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("\"title\""), "message was: {}", msg);
    assert!(msg.contains("\"STRNG\""), "message was: {}", msg);
    assert!(editor.store().is_empty());

    assert_eq!(format_text(&text), Err(FormgenError::schema_type("title", "STRNG")));
}

#[test]
fn test_deep_violation_reports_dotted_ancestor_chain() {
    let text = json!({
        "schema": {
            "name": "STRING",
            "address": { "geo": { "lat": "FLOATNUMBER", "lng": "FLOAT" } }
        },
        "namingConvention": posts_naming()
    })
    .to_string();

    match format_text(&text) {
        Err(FormgenError::SchemaType { path, tag }) => {
            assert_eq!(path, "address.geo.lng");
            assert_eq!(tag, "FLOAT");
        }
        other => panic!("Expected SchemaType error, got {:?}", other),
    }
}

#[test]
fn test_naming_violation_names_key() {
    let mut naming = posts_naming();
    naming["Users_1_000___"] = json!("PostsABC");
    let text = json!({ "schema": { "title": "STRING" }, "namingConvention": naming }).to_string();

    match format_text(&text) {
        Err(FormgenError::NamingConvention { key, value }) => {
            assert_eq!(key, "Users_1_000___");
            assert_eq!(value, "PostsABC");
        }
        other => panic!("Expected NamingConvention error, got {:?}", other),
    }
}

#[test]
fn test_naming_exemptions_never_fail() {
    let text = json!({
        "schema": {},
        "namingConvention": {
            "Users_1_000___": "X",
            "users_2_000___": 12,
            "User_3_000___": false,
            "user_4_000___": ""
        }
    })
    .to_string();
    assert!(format_text(&text).is_ok());
}

#[test]
fn test_option_and_flag_suffixes_accepted() {
    let text = json!({
        "schema": {
            "status": "SELECT#Draft,Published",
            "email": "EMAIL#readonly",
            "tags": "MULTIOPTIONS#a,b#readonly",
            "period": "DATERANGE"
        },
        "namingConvention": posts_naming()
    })
    .to_string();

    let template = Template::parse(&text).unwrap();
    let fields = template.schema.fields();
    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0].field_type.options, vec!["Draft", "Published"]);
    assert!(fields[1].field_type.readonly);
    assert_eq!(fields[2].field_type.base, TypeTag::MultiOptions);
    assert_eq!(fields[3].field_type.base.ts_type(), "[string, string]");
}

#[test]
fn test_format_without_schema_checks_naming_only() {
    let text = json!({ "namingConvention": posts_naming() }).to_string();
    assert!(format_text(&text).is_ok());

    // Save still requires a schema object.
    let mut editor = TemplateEditor::new(GeneratorConfig::default());
    editor.set_text(text);
    assert_eq!(editor.save().unwrap_err(), FormgenError::SchemaShape);
}

#[test]
fn test_wrong_field_types_name_the_field_in_format_and_save() {
    let mut bad_bulk = posts_naming();
    bad_bulk["bulk_action"] = json!([1]);

    let cases = [
        ("uid", json!({ "uid": 42, "schema": { "title": "STRING" } })),
        ("templateName", json!({ "templateName": ["Posts"], "schema": {} })),
        ("namingConvention", json!({ "schema": {}, "namingConvention": null })),
        ("namingConvention", json!({ "schema": {}, "namingConvention": bad_bulk })),
    ];

    for (expected, template) in cases {
        let text = template.to_string();

        let err = format_text(&text).unwrap_err();
        assert!(
            matches!(err, FormgenError::TemplateShape { ref field, .. } if field == expected),
            "format: {err:?}"
        );
        assert!(err.to_string().contains(expected));

        let mut editor = TemplateEditor::new(GeneratorConfig::default());
        editor.set_text(text.clone());
        let err = editor.save().unwrap_err();
        assert!(
            matches!(err, FormgenError::TemplateShape { ref field, .. } if field == expected),
            "save: {err:?}"
        );
        assert!(err.is_validation());
        assert_eq!(editor.text(), text);
        assert!(editor.store().is_empty());
    }
}

#[test]
fn test_null_uid_counts_as_absent() {
    let text = json!({ "uid": null, "schema": {}, "namingConvention": posts_naming() }).to_string();
    assert!(format_text(&text).is_ok());
    assert!(Template::parse(&text).unwrap().needs_uid());
}
