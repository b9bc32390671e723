//! `if`/`else`, interpolation and filters.

use indoc::indoc;
use serde_json::json;
use undox_liquid::{FilterRegistry, Liquid, Settings, Variables, render};

fn liquid(source: &str, vars: serde_json::Value) -> String {
    let vars = Variables::try_from(vars).unwrap();
    render(source, &vars, "", &Settings::default()).unwrap()
}

#[test]
fn test_else_branch() {
    assert_eq!(
        liquid(
            "{% if needCapitalize %} Y {% else %} N {% endif %}",
            json!({"needCapitalize": false})
        ),
        " N "
    );
    assert_eq!(
        liquid(
            "{% if needCapitalize %} Y {% else %} N {% endif %}",
            json!({"needCapitalize": true})
        ),
        " Y "
    );
}

#[test]
fn test_missing_else_renders_nothing() {
    assert_eq!(liquid("[{% if flag %}x{% endif %}]", json!({"flag": false})), "[]");
    assert_eq!(liquid("[{% if flag %}x{% endif %}]", json!({})), "[]");
}

#[test]
fn test_multiline_condition() {
    let input = indoc! {"
        # Install
        {% if os.windows %}
        Run the installer.
        {% else %}
        Use your package manager.
        {% endif %}
        Done."};

    assert_eq!(
        liquid(input, json!({"os": {"windows": true}})),
        "# Install\nRun the installer.\nDone."
    );
    assert_eq!(
        liquid(input, json!({"os": {"windows": false}})),
        "# Install\nUse your package manager.\nDone."
    );
}

#[test]
fn test_nested_conditions() {
    let source = "{% if a %}A{% if b %}B{% else %}b{% endif %}{% else %}-{% endif %}";
    assert_eq!(liquid(source, json!({"a": 1, "b": 0})), "Ab");
    assert_eq!(liquid(source, json!({"a": 1, "b": "yes"})), "AB");
    assert_eq!(liquid(source, json!({"a": null, "b": true})), "-");
}

#[test]
fn test_statements_sharing_a_line_are_elided_together() {
    let input = "before\n{% if flag %}{% for u in users %}\n- {{u}}\n{% endfor %}{% endif %}\nafter";
    assert_eq!(
        liquid(input, json!({"flag": true, "users": ["a", "b"]})),
        "before\n- a\n- b\nafter"
    );
}

#[test]
fn test_filter_chains() {
    let vars = json!({"user": "alice", "title": "getting started"});
    assert_eq!(liquid("{{ user | capitalize }}", vars.clone()), "Alice");
    assert_eq!(liquid("{{ title | title }}", vars.clone()), "Getting Started");
    assert_eq!(liquid("{{ user | upper | length }}", vars.clone()), "5");
    assert_eq!(liquid("{{user|capitalize|lower}}", vars), "alice");
}

#[test]
fn test_host_registered_filter() {
    let mut filters = FilterRegistry::with_defaults();
    filters.register_fn("slug", |s| s.to_lowercase().replace(' ', "-"));
    let liquid = Liquid::new(Settings::default()).with_filters(filters);

    let vars = Variables::try_from(json!({"title": "Getting Started"})).unwrap();
    let out = liquid.render("/{{ title | slug }}/", &vars, "nav.md").unwrap();
    assert_eq!(out, "/getting-started/");
}

#[test]
fn test_malformed_interpolations_are_text() {
    let vars = json!({"a": 1});
    assert_eq!(liquid("{{ a b }}", vars.clone()), "{{ a b }}");
    assert_eq!(liquid("{{ }}", vars.clone()), "{{ }}");
    assert_eq!(liquid("{{ a | }}", vars), "{{ a | }}");
}

#[test]
fn test_not_var_escape() {
    let vars = Variables::try_from(json!({"name": "x"})).unwrap();
    let out = render("Use not_var{{ name }} literally", &vars, "", &Settings::default()).unwrap();
    assert_eq!(out, "Use {{ name }} literally");

    let settings = Settings {
        keep_not_var: true,
        ..Settings::default()
    };
    let out = render("Use not_var{{ name }} literally", &vars, "", &settings).unwrap();
    assert_eq!(out, "Use not_var{{ name }} literally");
}

#[test]
fn test_unknown_statements_are_text() {
    let input = "{% note info %}\n{{ a }}\n{% endnote %}";
    assert_eq!(liquid(input, json!({"a": "x"})), "{% note info %}\nx\n{% endnote %}");
}

#[test]
fn test_whitespace_control_dashes_are_accepted() {
    assert_eq!(liquid("{%- if a -%}yes{%- endif -%}", json!({"a": true})), "yes");
}

#[test]
fn test_disabled_features_leave_tags() {
    let vars = Variables::try_from(json!({"a": true, "b": "x"})).unwrap();

    let settings = Settings {
        conditions: false,
        ..Settings::default()
    };
    let out = render("{% if a %}{{b}}{% endif %}", &vars, "", &settings).unwrap();
    assert_eq!(out, "{% if a %}x{% endif %}");

    let settings = Settings {
        substitutions: false,
        ..Settings::default()
    };
    let out = render("{% if a %}{{b}}{% endif %}", &vars, "", &settings).unwrap();
    assert_eq!(out, "{{b}}");
}

#[test]
fn test_identity_for_text_without_tags() {
    let texts = [
        "",
        "plain",
        "# Title\n\nSome *markdown* with {braces} and 100% {x}.\n",
        "line\r\nendings\r\n",
        "```js\nconst a = {b: 1};\n```\n",
        "{ {not} } { %nope% }",
    ];
    for text in texts {
        assert_eq!(liquid(text, json!({"x": 1})), text);
    }
}
