//! News shown on the public site. The articles are bundled with the site.

use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NewsArticle {
    pub id: &'static str,
    pub title: &'static str,
    pub excerpt: &'static str,
    pub date: &'static str,
    pub image: &'static str,
    pub intro: &'static str,
    pub content: &'static [&'static str],
}

pub const NEWS_PLACEHOLDER_IMAGE: &str = "/assets/images/news-placeholder.svg";

static NEWS: [NewsArticle; 4] = [
    NewsArticle {
        id: "1",
        title: "Vietcombank chung tay đồng hành cùng các cơ quan thuế TP. Hồ Chí Minh và các hộ kinh doanh trên địa bàn thực hiện chuyển đổi mô hình, phương thức quản lý thuế",
        excerpt: "Sáng ngày 14/11/2025, tại trụ sở Thuế Tp.Hồ Chí Minh đã trang trọng diễn ra buổi Lễ ký kết th...",
        date: "17/11/2025 09:55",
        image: "/assets/images/news-1.jpg",
        intro: "Sáng ngày 14/11/2025, tại trụ sở Thuế Tp.Hồ Chí Minh đã trang trọng diễn ra buổi Lễ ký kết thỏa thuận hợp tác 'Các giải pháp hỗ trợ đối với hộ kinh doanh giữa Thuế Tp.Hồ Chí Minh và các nhà cung cấp giải pháp'.",
        content: &[
            "Tham dự buổi lễ có ông Nguyễn Văn Thành - Phó trưởng Thuế Tp.Hồ Chí Minh; bà Nguyễn Thị Cúc - Chủ tịch Hội tư vấn Thuế Việt Nam; đại diện lãnh đạo các đơn vị nghiệp vụ Thuế Tp.Hồ Chí Minh và 29 Thuế cơ sở trên địa bàn, cùng đại diện của các ngân hàng, nhà cung cấp giải pháp và các cơ quan thông tin báo chí, truyền hình.",
            "Về phía Vietcombank có bà Đoàn Hồng Nhung - Thành viên Ban điều hành, Giám đốc Khối bán lẻ; các ông/bà là lãnh đạo các đơn vị có liên quan của Trụ sở chính và đại diện Ban Giám đốc của 27 chi nhánh Vietcombank trên địa bàn thành phố.",
            "Tại buổi Lễ, ông Nguyễn Văn Thành - Phó trưởng Thuế Tp.Hồ Chí Minh đã phát biểu: “Việc thực hiện chuyển đổi mô hình từ thuế khoán sang thuế kê khai theo Nghị định 198 của Quốc hội từ ngày 1/1/2026 là rất đúng đắn và cần thiết, giúp các hộ kinh doanh quản lý, thực hiện nghĩa vụ thuế với nhà nước một cách hiệu quả và bền vững.”",
        ],
    },
    NewsArticle {
        id: "2",
        title: "Viecombank Hà Nội tổ chức tập huấn, diễn tập các phương án phòng chống tội phạm cướp ngân hàng",
        excerpt: "Tập huấn và diễn tập công tác phòng chống tội phạm cướp ngân hàng là một trong những hoạt động...",
        date: "17/11/2025 08:39",
        image: "/assets/images/news-2.jpg",
        intro: "Tập huấn và diễn tập công tác phòng chống tội phạm cướp ngân hàng là một trong những hoạt động...",
        content: &[],
    },
    NewsArticle {
        id: "3",
        title: "Vietcombank Đà Nẵng đồng hành cùng Thuế thành phố trong chiến dịch 60 ngày hỗ trợ hộ kinh doanh",
        excerpt: "Sáng ngày 12/11/2025, Vietcombank Đà Nẵng và Thuế thành phố Đà Nẵng ký kết thỏa thuận...",
        date: "17/11/2025 08:31",
        image: "/assets/images/news-3.jpg",
        intro: "Sáng ngày 12/11/2025, Vietcombank Đà Nẵng và Thuế thành phố Đà Nẵng ký kết thỏa thuận...",
        content: &[],
    },
    NewsArticle {
        id: "4",
        title: "Vietcombank thông báo lãi suất trái phiếu VCBH2131005",
        excerpt: "Ngân hàng TMCP Ngoại thương Việt Nam (Vietcombank) thông báo lãi suất áp dụng cho trái...",
        date: "14/11/2025 16:00",
        image: "/assets/images/news-4.jpg",
        intro: "Ngân hàng TMCP Ngoại thương Việt Nam (Vietcombank) thông báo lãi suất áp dụng cho trái...",
        content: &[],
    },
];

pub fn list_news() -> &'static [NewsArticle] {
    &NEWS
}

/// Article `id`; unknown ids show the first article.
pub fn news_detail(id: &str) -> &'static NewsArticle {
    NEWS.iter().find(|article| article.id == id).unwrap_or(&NEWS[0])
}
