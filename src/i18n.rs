//! Two-language string table for every label the UI renders.
//!
//! Static data; switching language swaps the whole table at once.

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    En,
    Vi,
}

impl Lang {
    pub fn toggle(self) -> Self {
        match self {
            Lang::En => Lang::Vi,
            Lang::Vi => Lang::En,
        }
    }
}

/// All UI labels for one language.
pub struct Strings {
    pub status_available: &'static str,
    pub status_busy: &'static str,
    pub category_all: &'static str,
    pub search_placeholder: &'static str,
    pub no_results: &'static str,
    pub music_title: &'static str,
    pub now_playing: &'static str,
    pub paused: &'static str,
    pub analytics_title: &'static str,
    pub total_clicks: &'static str,
    pub top_links: &'static str,
    pub export_csv: &'static str,
    pub analytics_exported: &'static str,
    pub contact_title: &'static str,
    pub contact_name: &'static str,
    pub contact_email: &'static str,
    pub contact_message: &'static str,
    pub fill_required: &'static str,
    pub invalid_email: &'static str,
    pub email_sent: &'static str,
    pub send: &'static str,
    pub share_title: &'static str,
    pub add_to_contacts: &'static str,
    pub vcard_downloaded: &'static str,
    pub loading_profile: &'static str,
    pub load_error: &'static str,
    pub check_data: &'static str,
    pub retry_hint: &'static str,
}

const EN: Strings = Strings {
    status_available: "Available",
    status_busy: "Busy",
    category_all: "All",
    search_placeholder: "Search links...",
    no_results: "No links found for",
    music_title: "Music Player",
    now_playing: "Now Playing",
    paused: "Paused",
    analytics_title: "Analytics",
    total_clicks: "Total clicks",
    top_links: "Top Links",
    export_csv: "Export CSV",
    analytics_exported: "Analytics exported",
    contact_title: "Contact",
    contact_name: "Your name",
    contact_email: "Your email",
    contact_message: "Your message",
    fill_required: "Please fill in all fields",
    invalid_email: "Invalid email address",
    email_sent: "Opening email client...",
    send: "Send",
    share_title: "Donate",
    add_to_contacts: "Add to Contacts",
    vcard_downloaded: "vCard downloaded",
    loading_profile: "Loading profile...",
    load_error: "Error Loading Profile",
    check_data: "Please check your data.json file",
    retry_hint: "Press R to retry",
};

const VI: Strings = Strings {
    status_available: "Có thể liên hệ",
    status_busy: "Đang bận",
    category_all: "Tất cả",
    search_placeholder: "Tìm kiếm link...",
    no_results: "Không tìm thấy link nào với từ khóa",
    music_title: "Trình phát nhạc",
    now_playing: "Đang phát",
    paused: "Tạm dừng",
    analytics_title: "Thống kê",
    total_clicks: "Tổng lượt click",
    top_links: "Top Links",
    export_csv: "Xuất CSV",
    analytics_exported: "Analytics đã được xuất",
    contact_title: "Liên Hệ",
    contact_name: "Bí danh",
    contact_email: "Email của bạn",
    contact_message: "Tin nhắn của bạn",
    fill_required: "Vui lòng điền thông tin",
    invalid_email: "Email không hợp lệ",
    email_sent: "Đang mở ứng dụng email...",
    send: "Gửi",
    share_title: "Ủng hộ",
    add_to_contacts: "Thêm vào danh bạ",
    vcard_downloaded: "vCard đã được tải xuống",
    loading_profile: "Đang tải hồ sơ...",
    load_error: "Lỗi tải hồ sơ",
    check_data: "Vui lòng kiểm tra file data.json",
    retry_hint: "Nhấn R để thử lại",
};

impl Strings {
    pub fn for_lang(lang: Lang) -> &'static Strings {
        match lang {
            Lang::En => &EN,
            Lang::Vi => &VI,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_the_two_languages() {
        assert_eq!(Lang::En.toggle(), Lang::Vi);
        assert_eq!(Lang::Vi.toggle(), Lang::En);
    }

    #[test]
    fn both_tables_are_distinct() {
        let en = Strings::for_lang(Lang::En);
        let vi = Strings::for_lang(Lang::Vi);
        assert_eq!(en.category_all, "All");
        assert_eq!(vi.category_all, "Tất cả");
        assert_ne!(en.contact_title, vi.contact_title);
    }
}
