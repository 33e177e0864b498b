//! XML serialization for external transforms.
//!
//! Some hosts still post-process the grid through an XSLT stylesheet. This
//! module serializes any `Serialize` tree under a named root element using
//! quick-xml's serde support: fields renamed with a leading `@` become
//! attributes, sequences become repeated elements.

use serde::Serialize;

use crate::error::RenderError;

/// Serializes `data` as an XML document rooted at `root`.
///
/// # Example
///
/// ```
/// use datagrid_render::serialize_to_xml;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Header {
///     #[serde(rename = "@field")]
///     field: String,
/// }
///
/// #[derive(Serialize)]
/// struct Headers {
///     header: Vec<Header>,
/// }
///
/// let xml = serialize_to_xml(
///     "headers",
///     &Headers { header: vec![Header { field: "u.name".into() }] },
/// )
/// .unwrap();
/// assert_eq!(xml, r#"<headers><header field="u.name"/></headers>"#);
/// ```
pub fn serialize_to_xml<T: Serialize + ?Sized>(root: &str, data: &T) -> Result<String, RenderError> {
    Ok(quick_xml::se::to_string_with_root(root, data)?)
}
