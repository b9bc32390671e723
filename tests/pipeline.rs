//! Config, variables and pipeline working together on real files.

use indoc::indoc;
use undox_liquid::{
    Liquid,
    config::RootConfig,
    pipeline::{Pipeline, PipelineContext, PipelineError, ProcessingDocument},
    variables,
};

#[tokio::test]
async fn test_render_documents_to_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    std::fs::create_dir_all(root.join("vars")).unwrap();
    std::fs::write(
        root.join("undox-liquid.yaml"),
        indoc! {"
            liquid:
              conditions_in_code: true
            vars:
              - vars/site.yaml
              - vars/users.json
        "},
    )
    .unwrap();
    std::fs::write(root.join("vars/site.yaml"), "product: undox\nusers: [nobody]\n").unwrap();
    std::fs::write(root.join("vars/users.json"), r#"{"users": ["alice", "ivan"]}"#).unwrap();

    let config = RootConfig::load_from_arg(Some(&root.join("undox-liquid.yaml")))
        .await
        .unwrap();
    assert!(config.liquid.conditions_in_code);

    let vars = variables::load_all(&config.vars).await.unwrap();
    let liquid = Liquid::new(config.liquid);
    let output = root.join("out");
    let ctx = PipelineContext::new(&liquid, &vars, Some(&output));

    let mut docs = vec![ProcessingDocument::new(
        "guide/users.md",
        indoc! {"
            # {{ product | capitalize }} users
            {% for user in users %}
            - {{ user | capitalize }}
            {% endfor %}
            ```
            {{ product }}
            ```
        "}
        .to_string(),
    )];
    Pipeline::default_pipeline().run(&mut docs, &ctx).unwrap();

    let written = std::fs::read_to_string(output.join("guide/users.md")).unwrap();
    assert_eq!(written, "# Undox users\n- Alice\n- Ivan\n```\nundox\n```\n");
}

#[tokio::test]
async fn test_render_error_stops_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out");
    let liquid = Liquid::default();
    let vars = undox_liquid::Variables::new();
    let ctx = PipelineContext::new(&liquid, &vars, Some(&output));

    let mut docs = vec![
        ProcessingDocument::new("good.md", "fine".to_string()),
        ProcessingDocument::new("bad.md", "{% for x in xs %}".to_string()),
    ];
    let err = Pipeline::default_pipeline().run(&mut docs, &ctx).unwrap_err();
    assert!(matches!(err, PipelineError::Liquid(_)));
    assert!(err.to_string().starts_with("bad.md:1:1:"), "{err}");
    assert!(!output.exists());
}

#[tokio::test]
async fn test_load_document_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.md");
    std::fs::write(&path, "{{ x }}").unwrap();

    let doc = ProcessingDocument::load(&path).await.unwrap();
    assert_eq!(doc.content, "{{ x }}");
    assert_eq!(doc.output_path(), std::path::PathBuf::from("doc.md"));
    assert!(!doc.rendered);
}
