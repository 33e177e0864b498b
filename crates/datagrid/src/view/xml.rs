//! XML form of a [`GridDocument`] for hosts that transform it with XSLT.
//!
//! ```xml
//! <data>
//!   <meta>
//!     <key>…</key>
//!     <url path_info="/users" query_string="…"/>
//!     <pager>…markup…</pager>
//!     <exports><export type="csv"/></exports>
//!     <filters>
//!       <filter display="" field="u.city" type="Select">
//!         <options><option display="London"/></options>
//!       </filter>
//!     </filters>
//!     <numresults>3</numresults>
//!   </meta>
//!   <headers><header display="City" field="u.city" allow_filter="Yes"/></headers>
//!   <records><record><field display="London"/></record></records>
//! </data>
//! ```

use datagrid_render::serialize_to_xml;
use serde::Serialize;

use super::html::GridDocument;
use crate::error::GridError;

#[derive(Serialize)]
struct Data<'a> {
    meta: Meta<'a>,
    headers: Headers<'a>,
    records: Records<'a>,
}

#[derive(Serialize)]
struct Meta<'a> {
    key: &'a str,
    url: Url<'a>,
    pager: &'a str,
    exports: Exports<'a>,
    filters: Filters<'a>,
    numresults: usize,
}

#[derive(Serialize)]
struct Url<'a> {
    #[serde(rename = "@path_info")]
    path_info: &'a str,
    #[serde(rename = "@query_string")]
    query_string: &'a str,
}

#[derive(Serialize)]
struct Exports<'a> {
    export: Vec<Export<'a>>,
}

#[derive(Serialize)]
struct Export<'a> {
    #[serde(rename = "@type")]
    format: &'a str,
}

#[derive(Serialize)]
struct Filters<'a> {
    filter: Vec<Filter<'a>>,
}

#[derive(Serialize)]
struct Filter<'a> {
    #[serde(rename = "@display")]
    display: &'a str,
    #[serde(rename = "@field")]
    field: &'a str,
    #[serde(rename = "@type")]
    control: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<Options<'a>>,
}

#[derive(Serialize)]
struct Options<'a> {
    option: Vec<Display<'a>>,
}

#[derive(Serialize)]
struct Display<'a> {
    #[serde(rename = "@display")]
    display: &'a str,
}

#[derive(Serialize)]
struct Headers<'a> {
    header: Vec<Header<'a>>,
}

#[derive(Serialize)]
struct Header<'a> {
    #[serde(rename = "@display")]
    display: &'a str,
    #[serde(rename = "@field")]
    field: &'a str,
    #[serde(rename = "@allow_filter")]
    allow_filter: &'static str,
}

#[derive(Serialize)]
struct Records<'a> {
    record: Vec<Row<'a>>,
}

#[derive(Serialize)]
struct Row<'a> {
    field: Vec<Display<'a>>,
}

pub(crate) fn to_xml(doc: &GridDocument) -> Result<String, GridError> {
    let meta = &doc.meta;
    let data = Data {
        meta: Meta {
            key: &meta.key,
            url: Url {
                path_info: &meta.url.path,
                query_string: &meta.url.query_string,
            },
            pager: &meta.pager,
            exports: Exports {
                export: meta
                    .exports
                    .iter()
                    .map(|e| Export { format: &e.format })
                    .collect(),
            },
            filters: Filters {
                filter: meta
                    .filters
                    .iter()
                    .map(|f| Filter {
                        display: &f.display,
                        field: &f.field,
                        control: f.control.as_str(),
                        options: (!f.options.is_empty()).then(|| Options {
                            option: f.options.iter().map(|o| Display { display: o }).collect(),
                        }),
                    })
                    .collect(),
            },
            numresults: meta.numresults,
        },
        headers: Headers {
            header: doc
                .headers
                .iter()
                .map(|h| Header {
                    display: &h.display,
                    field: &h.field,
                    allow_filter: if h.allow_filter { "Yes" } else { "No" },
                })
                .collect(),
        },
        records: Records {
            record: doc
                .records
                .iter()
                .map(|r| Row {
                    field: r.fields.iter().map(|v| Display { display: v }).collect(),
                })
                .collect(),
        },
    };
    Ok(serialize_to_xml("data", &data)?)
}
