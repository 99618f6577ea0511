//
//  cf-client
//  jsonry/path.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Path tags.
//!
//! A tag is a dot-separated path with optional `[]` list markers and an
//! optional `,omitempty` suffix:
//!
//! ```text
//! relationships.space.data.guid
//! resources[].metadata.guid,omitempty
//! ```
//!
//! A tag with an empty path (`""` or `",omitempty"`) falls back to the
//! lower-cased field name.

use std::fmt;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    /// `true` when the segment was written as `name[]`
    pub list: bool,
}

/// A parsed tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub segments: Vec<Segment>,
    pub omit_empty: bool,
}

impl Path {
    /// Parses `tag` for the field called `field_name`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cf_client::jsonry::Path;
    ///
    /// let path = Path::parse("entity.plans[].guid,omitempty", "PlanGUIDs");
    /// assert_eq!(path.to_string(), "entity.plans[].guid");
    /// assert!(path.omit_empty);
    /// assert!(path.segments[1].list);
    ///
    /// let fallback = Path::parse("", "Name");
    /// assert_eq!(fallback.to_string(), "name");
    /// ```
    pub fn parse(tag: &str, field_name: &str) -> Self {
        let mut parts = tag.split(',');
        let raw_path = parts.next().unwrap_or("").trim();
        let omit_empty = parts.any(|option| option.trim() == "omitempty");

        let raw_path = if raw_path.is_empty() {
            field_name.to_lowercase()
        } else {
            raw_path.to_string()
        };

        let segments = raw_path
            .split('.')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_suffix("[]") {
                Some(name) => Segment {
                    name: name.to_string(),
                    list: true,
                },
                None => Segment {
                    name: s.to_string(),
                    list: false,
                },
            })
            .collect();

        Self {
            segments,
            omit_empty,
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .segments
            .iter()
            .map(|s| {
                if s.list {
                    format!("{}[]", s.name)
                } else {
                    s.name.clone()
                }
            })
            .collect();
        f.write_str(&rendered.join("."))
    }
}
