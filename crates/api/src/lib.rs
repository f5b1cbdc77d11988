#![forbid(unsafe_code)]

pub mod auth_middleware;
pub mod common;
pub mod error;
pub mod routers;

#[cfg(test)]
mod test_utils;

use lazy_static::lazy_static;
use tera::Tera;

lazy_static! {
    pub static ref TEMPLATES: Tera = {
        let mut tera = Tera::default();
        if let Err(err) = tera.add_raw_templates(vec![
            ("base.html", include_str!("../templates/base.html")),
            ("login.html", include_str!("../templates/login.html")),
            ("home.html", include_str!("../templates/home.html")),
        ]) {
            log::error!("Parsing error(s): {}", err);
            ::std::process::exit(1);
        }
        tera
    };
}
