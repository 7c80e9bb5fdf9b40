//! `GET /`

use axum::Json;
use serde::Serialize;

/// Where residents can leave criticism and suggestions.
pub const FEEDBACK_URL: &str = "https://suara-desa-pilangrejo.vercel.app/";

#[derive(Debug, Serialize)]
pub struct Link {
  pub label: &'static str,
  pub href:  &'static str,
}

#[derive(Debug, Serialize)]
pub struct Landing {
  pub title:    &'static str,
  pub tagline:  &'static str,
  pub feedback: Link,
  pub pages:    Vec<Link>,
}

pub async fn handler() -> Json<Landing> {
  Json(Landing {
    title:    "Duta Desa",
    tagline:  "Mewujudkan desa cerdas dengan data yang tepat!",
    feedback: Link { label: "Buat kritik & saran", href: FEEDBACK_URL },
    pages:    vec![
      Link { label: "Dashboard", href: "/dashboard" },
      Link { label: "Data Penduduk", href: "/data-penduduk" },
      Link { label: "Tambah Data Penduduk", href: "/tambah-data-penduduk" },
      Link { label: "Masuk", href: "/login" },
    ],
  })
}
