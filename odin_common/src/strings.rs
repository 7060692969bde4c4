/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! string utilities

use std::borrow::Cow;
use regex::{Regex,Captures};
use lazy_static::lazy_static;

lazy_static! {
    static ref ENV_VAR_RE: Regex = Regex::new( r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
}

/// expand `${VAR}` references from the process environment. Undefined variables expand into empty strings
pub fn env_expand (s: &str)->Cow<'_,str> {
    env_expand_with( s, |name| std::env::var(name).ok())
}

/// expand `${VAR}` references with values obtained from the provided lookup function.
/// This is mostly used to keep secrets out of config files
pub fn env_expand_with<F> (s: &str, lookup: F)->Cow<'_,str> where F: Fn(&str)->Option<String> {
    ENV_VAR_RE.replace_all( s, |caps: &Captures| {
        lookup( &caps[1]).unwrap_or_default()
    })
}

/// return None for empty or whitespace-only strings, trimmed String otherwise
pub fn non_empty (s: &str)->Option<String> {
    let s = s.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}
