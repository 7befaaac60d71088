//! Festival themes and their display metadata.

use clap::ValueEnum;
use serde::Deserialize;

/// A festival or occasion that drives prompt content.
///
/// Each theme accepts either its short slug or its exact display label, both
/// on the command line and in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Deserialize)]
pub enum Theme {
    /// Lunar new year.
    #[default]
    #[value(name = "tet", alias = "Tết Nguyên Đán")]
    #[serde(rename = "tet", alias = "Tết Nguyên Đán")]
    Tet,
    /// Christmas.
    #[value(name = "christmas", alias = "Giáng Sinh (Noel)")]
    #[serde(rename = "christmas", alias = "Giáng Sinh (Noel)")]
    Christmas,
    /// Gregorian new year.
    #[value(name = "new-year", alias = "Năm Mới (New Year)")]
    #[serde(rename = "new-year", alias = "Năm Mới (New Year)")]
    NewYear,
    /// Halloween.
    #[value(name = "halloween", alias = "Halloween")]
    #[serde(rename = "halloween", alias = "Halloween")]
    Halloween,
    /// Mid-autumn festival.
    #[value(name = "mid-autumn", alias = "Tết Trung Thu")]
    #[serde(rename = "mid-autumn", alias = "Tết Trung Thu")]
    MidAutumn,
    /// Vietnamese Women's Day, 20 October.
    #[value(name = "vietnamese-womens-day", alias = "Ngày Phụ nữ Việt Nam (20-10)")]
    #[serde(rename = "vietnamese-womens-day", alias = "Ngày Phụ nữ Việt Nam (20-10)")]
    VietnameseWomensDay,
    /// International Women's Day, 8 March.
    #[value(name = "womens-day", alias = "Quốc tế Phụ nữ (8-3)")]
    #[serde(rename = "womens-day", alias = "Quốc tế Phụ nữ (8-3)")]
    WomensDay,
    /// Valentine's Day, 14 February.
    #[value(name = "valentine", alias = "Valentine (14-2)")]
    #[serde(rename = "valentine", alias = "Valentine (14-2)")]
    Valentine,
}

impl Theme {
    /// Every theme, in display order.
    pub const ALL: [Theme; 8] = [
        Theme::Tet,
        Theme::Christmas,
        Theme::NewYear,
        Theme::Halloween,
        Theme::MidAutumn,
        Theme::VietnameseWomensDay,
        Theme::WomensDay,
        Theme::Valentine,
    ];

    /// Display label, interpolated verbatim into prompts.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Tet => "Tết Nguyên Đán",
            Self::Christmas => "Giáng Sinh (Noel)",
            Self::NewYear => "Năm Mới (New Year)",
            Self::Halloween => "Halloween",
            Self::MidAutumn => "Tết Trung Thu",
            Self::VietnameseWomensDay => "Ngày Phụ nữ Việt Nam (20-10)",
            Self::WomensDay => "Quốc tế Phụ nữ (8-3)",
            Self::Valentine => "Valentine (14-2)",
        }
    }

    /// Short ASCII name used on the command line and in filenames.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Tet => "tet",
            Self::Christmas => "christmas",
            Self::NewYear => "new-year",
            Self::Halloween => "halloween",
            Self::MidAutumn => "mid-autumn",
            Self::VietnameseWomensDay => "vietnamese-womens-day",
            Self::WomensDay => "womens-day",
            Self::Valentine => "valentine",
        }
    }

    /// Hint text for the free-form details field.
    #[must_use]
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Tet => "Ví dụ: mặc áo dài đỏ, cầm bao lì xì, bên cạnh cành hoa mai/đào...",
            Self::Christmas => "Ví dụ: mặc áo len đỏ, bên cây thông, tuyết rơi...",
            Self::NewYear => "Ví dụ: pháo hoa rực rỡ, ly sâm panh, đồng hồ đếm ngược...",
            Self::Halloween => "Ví dụ: trang phục phù thủy, quả bí ngô, lâu đài ma ám...",
            Self::MidAutumn => "Ví dụ: cầm đèn lồng, phá cỗ, ngắm trăng...",
            Self::VietnameseWomensDay => "Ví dụ: mặc áo dài truyền thống, ôm bó hoa sen...",
            Self::WomensDay => {
                "Ví dụ: phong cách hiện đại, cầm hoa hồng, ở một quán cà phê sang trọng..."
            }
            Self::Valentine => "Ví dụ: váy đỏ quyến rũ, nhận hộp socola, nến và hoa hồng...",
        }
    }

    /// Suggested detail snippets.
    #[must_use]
    pub fn suggestions(self) -> &'static [&'static str] {
        match self {
            Self::Tet => &["Áo dài đỏ", "Bao lì xì", "Cành hoa mai", "Cành hoa đào", "Mâm ngũ quả"],
            Self::Christmas => {
                &["Bên cây thông", "Lò sưởi ấm cúng", "Hộp quà", "Tuyết rơi", "Áo len đỏ"]
            }
            Self::NewYear => &["Pháo hoa", "Ly sâm panh", "Đồng hồ đếm ngược", "Bữa tiệc sang trọng"],
            Self::Halloween => &[
                "Trang phục phù thủy",
                "Quả bí ngô",
                "Lâu đài ma ám",
                "Kẹo \"trick or treat\"",
            ],
            Self::MidAutumn => &["Cầm đèn lồng", "Mặt nạ sư tử", "Bánh trung thu", "Ngắm trăng rằm"],
            Self::VietnameseWomensDay => {
                &["Áo dài truyền thống", "Bó hoa sen", "Bối cảnh phố cổ", "Nền nã, dịu dàng"]
            }
            Self::WomensDay => &[
                "Phong cách hiện đại",
                "Bó hoa hồng",
                "Quán cà phê sang trọng",
                "Tự tin, rạng rỡ",
            ],
            Self::Valentine => {
                &["Váy đỏ quyến rũ", "Hộp socola", "Nến và hoa hồng", "Bữa tối lãng mạn"]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_first_theme() {
        assert_eq!(Theme::default(), Theme::ALL[0]);
        assert_eq!(Theme::default().label(), "Tết Nguyên Đán");
    }

    #[test]
    fn lookup_by_slug_and_label() {
        assert_eq!(Theme::from_str("tet", false), Ok(Theme::Tet));
        assert_eq!(Theme::from_str("Tết Nguyên Đán", false), Ok(Theme::Tet));
        assert_eq!(Theme::from_str("Valentine (14-2)", false), Ok(Theme::Valentine));
        assert!(Theme::from_str("easter", false).is_err());
    }

    #[test]
    fn slugs_are_unique_ascii() {
        for (i, a) in Theme::ALL.iter().enumerate() {
            assert!(a.slug().is_ascii());
            for b in &Theme::ALL[i + 1..] {
                assert_ne!(a.slug(), b.slug());
            }
        }
    }

    #[test]
    fn every_theme_has_metadata() {
        for theme in Theme::ALL {
            assert!(!theme.placeholder().is_empty());
            assert!(!theme.suggestions().is_empty());
        }
    }

    #[test]
    fn clap_accepts_label_alias() {
        let theme = Theme::from_str("Tết Trung Thu", false).unwrap();
        assert_eq!(theme, Theme::MidAutumn);
    }

    #[test]
    fn deserializes_from_slug_or_label() {
        #[derive(Deserialize)]
        struct Wrapper {
            theme: Theme,
        }
        let w: Wrapper = toml::from_str(r#"theme = "halloween""#).unwrap();
        assert_eq!(w.theme, Theme::Halloween);
        let w: Wrapper = toml::from_str(r#"theme = "Giáng Sinh (Noel)""#).unwrap();
        assert_eq!(w.theme, Theme::Christmas);
    }
}
