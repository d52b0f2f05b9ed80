//! `#[reflect(...)]` attribute parsing.

use syn::{Attribute, LitStr};

/// Options on the struct itself.
#[derive(Default)]
pub struct ContainerAttrs {
    /// A `#[reflect_methods]` block exists for this type.
    pub methods: bool,
}

/// Options on one struct field.
#[derive(Default)]
pub struct FieldAttrs {
    pub embed: bool,
    pub rename: Option<String>,
    /// Canonical `key:"value"` tag string.
    pub tag: String,
}

/// Options on one method of a `#[reflect_methods]` block.
#[derive(Default)]
pub struct MethodAttrs {
    pub skip: bool,
    pub rename: Option<String>,
}

pub fn is_reflect(attr: &Attribute) -> bool {
    attr.path().is_ident("reflect")
}

pub fn container(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut out = ContainerAttrs::default();
    for attr in attrs.iter().filter(|a| is_reflect(a)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("methods") {
                out.methods = true;
                Ok(())
            } else {
                Err(meta.error("unsupported reflect attribute, expected `methods`"))
            }
        })?;
    }
    Ok(out)
}

pub fn field(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    let mut pairs: Vec<(String, String)> = Vec::new();

    for attr in attrs.iter().filter(|a| is_reflect(a)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("embed") {
                out.embed = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                out.rename = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else if meta.path.is_ident("tag") {
                let raw = meta.value()?.parse::<LitStr>()?.value();
                push_raw(&mut out.tag, &raw);
                Ok(())
            } else if meta.path.is_ident("tags") {
                meta.parse_nested_meta(|entry| {
                    let key = entry
                        .path
                        .get_ident()
                        .ok_or_else(|| entry.error("tag keys must be plain identifiers"))?
                        .to_string();
                    let value = entry.value()?.parse::<LitStr>()?.value();
                    pairs.push((key, value));
                    Ok(())
                })
            } else {
                Err(meta.error("unsupported reflect attribute, expected `embed`, `rename`, `tag` or `tags`"))
            }
        })?;
    }

    for (key, value) in pairs {
        push_raw(&mut out.tag, &format!("{}:\"{}\"", key, escape(&value)));
    }
    Ok(out)
}

pub fn method(attrs: &[Attribute]) -> syn::Result<MethodAttrs> {
    let mut out = MethodAttrs::default();
    for attr in attrs.iter().filter(|a| is_reflect(a)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                out.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                out.rename = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else {
                Err(meta.error("unsupported reflect attribute, expected `skip` or `rename`"))
            }
        })?;
    }
    Ok(out)
}

fn push_raw(tag: &mut String, raw: &str) {
    let raw = raw.trim();
    if raw.is_empty() {
        return;
    }
    if !tag.is_empty() {
        tag.push(' ');
    }
    tag.push_str(raw);
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn tags_sugar_renders_canonical_string() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[reflect(tags(json = "name,omitempty", db = "a\"b"))])];
        let parsed = field(&attrs).unwrap();
        assert_eq!(parsed.tag, r#"json:"name,omitempty" db:"a\"b""#);
    }

    #[test]
    fn raw_tag_and_sugar_combine() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[reflect(tag = r#"tag:"be""#)]),
            parse_quote!(#[reflect(embed, tags(tag2 = "1,2,3"))]),
        ];
        let parsed = field(&attrs).unwrap();
        assert!(parsed.embed);
        assert_eq!(parsed.tag, r#"tag:"be" tag2:"1,2,3""#);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[reflect(flatten)])];
        assert!(field(&attrs).is_err());
        assert!(container(&attrs).is_err());
    }

    #[test]
    fn other_attributes_are_ignored() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[serde(rename = "x")]), parse_quote!(#[reflect(rename = "Name")])];
        assert_eq!(field(&attrs).unwrap().rename.as_deref(), Some("Name"));
    }
}
