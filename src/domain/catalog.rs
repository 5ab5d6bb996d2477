//! Static content for the variety catalog and about pages.

use super::labels::BananaVariety;
use crate::core::constants::NUM_CLASSES;
use serde::Serialize;

/// One catalog card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VarietyInfo {
    #[serde(rename = "label")]
    pub variety: BananaVariety,
    /// Image path relative to the asset directory.
    pub image: &'static str,
    pub description: &'static str,
}

/// Catalog entries in label order.
pub static CATALOG: [VarietyInfo; NUM_CLASSES] = [
    VarietyInfo {
        variety: BananaVariety::Ambon,
        image: "pisang/A.jpg",
        description: "Pisang Ambon memiliki kulit kuning kehijauan saat matang, daging buah putih kekuningan, dan rasa manis sedikit asam. Pisang ini sangat populer di Indonesia dan sering dimakan langsung sebagai camilan atau digunakan dalam aneka olahan makanan seperti pisang goreng dan kolak. Kandungan vitamin dan mineralnya membuatnya menjadi pilihan sehat bagi banyak orang.",
    },
    VarietyInfo {
        variety: BananaVariety::Cavendish,
        image: "pisang/cavendish.jpg",
        description: "Pisang Cavendish adalah jenis pisang yang paling umum secara internasional. Pisang ini dikenal karena bentuknya yang ramping, warna kuning cerah saat matang, dan teksturnya yang lembut. Selain enak dimakan langsung, Cavendish juga sering digunakan dalam smoothies, pancake, dan berbagai kue karena rasanya yang manis.",
    },
    VarietyInfo {
        variety: BananaVariety::Genderuwo,
        image: "pisang/Genderuwo.jpg",
        description: "Pisang Genderuwo merupakan varietas lokal yang cukup unik. Pisang ini memiliki kulit berwarna kemerahan atau kehitaman dan bentuk yang sedikit lebih besar. Teksturnya padat dan aroma khasnya membuatnya digemari di daerah tertentu. Biasanya pisang ini diolah terlebih dahulu sebelum dikonsumsi.",
    },
    VarietyInfo {
        variety: BananaVariety::Kepok,
        image: "pisang/Kepok.jpg",
        description: "Pisang Kepok memiliki bentuk yang lebih pendek dan gemuk dibanding pisang lainnya. Teksturnya padat, dengan rasa yang tidak terlalu manis. Pisang Kepok banyak digunakan untuk digoreng, dibuat keripik, atau dimasak sebagai campuran dalam makanan tradisional. Pisang ini juga terkenal sebagai pisang diet karena kandungan seratnya.",
    },
    VarietyInfo {
        variety: BananaVariety::Tanduk,
        image: "pisang/tanduk.jpg",
        description: "Pisang Tanduk berukuran sangat besar dan berbentuk melengkung seperti tanduk, sesuai dengan namanya. Pisang ini memiliki rasa yang kurang manis saat mentah, sehingga lebih sering dimasak terlebih dahulu. Pisang Tanduk sangat cocok untuk dibuat pisang goreng, kolak, atau dikukus sebagai camilan sehat.",
    },
];

impl VarietyInfo {
    /// Looks up the catalog entry of a variety.
    pub fn for_variety(variety: BananaVariety) -> &'static VarietyInfo {
        &CATALOG[variety.index()]
    }
}

/// Content of the about page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AboutInfo {
    pub title: &'static str,
    pub author: &'static str,
    pub description: &'static str,
    /// Logo path relative to the asset directory.
    pub logo: &'static str,
}

pub static ABOUT: AboutInfo = AboutInfo {
    title: "Tentang Aplikasi",
    author: "Riski Rahmadan",
    description: "Aplikasi ini menggunakan model Deep Learning EfficientNetV2S untuk mengklasifikasikan berbagai jenis pisang. Tujuannya adalah memberikan solusi cerdas berbasis gambar yang dapat mengenali jenis pisang secara akurat. Aplikasi ini cocok untuk edukasi, pengolahan dataset, dan eksplorasi teknologi AI di bidang pertanian digital.",
    logo: "banaclass.png",
};
