//! Fixed main-topic taxonomy offered by the topic filter.
//!
//! This list is independent of the categories observed in the backend: a
//! grouped topic whose main category is not listed here still shows up in the
//! topic data, it just cannot be picked in the filter.

pub const MAIN_TOPICS: [(&str, &[&str]); 7] = [
    (
        "พนักงานและบุคลากร",
        &[
            "ความสุภาพและมารยาทของพนักงาน",
            "ความเอาใจใส่ในการให้บริการลูกค้า",
            "ความสามารถในการตอบคำถามหรือให้คำแนะนำ",
            "ความถูกต้องในการให้บริการ",
            "ความรวดเร็วในการให้บริการ",
            "ความเป็นมืออาชีพและการแก้ไขปัญหาเฉพาะหน้า",
            "ความประทับใจในการให้บริการ",
            "รปภ",
            "แม่บ้าน",
        ],
    ),
    (
        "ระบบและกระบวนการให้บริการ",
        &[
            "ความพร้อมในการให้บริการ",
            "กระบวนการให้บริการ ความเป็นธรรมให้บริการ",
            "ระบบเรียกคิวและจัดการคิว",
            "ภาระเอกสาร",
        ],
    ),
    (
        "เทคโนโลยีและดิจิทัล",
        &[
            "ระบบ Core ของธนาคาร",
            "เครื่องออกบัตรคิว",
            "ATM ADM CDM",
            "E-KYC Scanner",
            "แอพพลิเคชั่น MyMo",
            "เครื่องปรับสมุด",
            "เครื่องนับเงิน",
        ],
    ),
    (
        "เงื่อนไขและผลิตภัณฑ์",
        &[
            "รายละเอียด ผลิตภัณฑ์",
            "เงื่อนไขอนุมัติ",
            "ระยะเวลาอนุมัติ",
            "ความยืดหยุ่น",
            "ความเรียบง่ายข้อมูล",
        ],
    ),
    (
        "สภาพแวดล้อมและสิ่งอำนวยความสะดวก",
        &[
            "ความสะอาด",
            "พื้นที่และความคับคั่ง",
            "อุณหภูมิ",
            "โต๊ะรับบริการ",
            "จุดรอรับบริการ",
            "แสง",
            "เสียง",
            "ห้องน้ำ",
            "ที่จอดรถ",
            "ป้าย-สื่อประชาสัมพันธ์",
            "สิ่งอำนวยความสะดวกอื่นๆ",
        ],
    ),
    (
        "Market Conduct",
        &["ไม่หลอกลวง", "ไม่เอาเปรียบ", "ไม่บังคับ", "ไม่รบกวน"],
    ),
    ("ความประทับใจอื่นๆ", &["ความประทับใจอื่นๆ"]),
];

pub fn main_topics() -> impl Iterator<Item = &'static str> {
    MAIN_TOPICS.iter().map(|(main, _)| *main)
}

pub fn sub_topics(main: &str) -> Option<&'static [&'static str]> {
    MAIN_TOPICS
        .iter()
        .find(|(name, _)| *name == main)
        .map(|(_, subs)| *subs)
}

pub fn is_main_topic(main: &str) -> bool {
    sub_topics(main).is_some()
}
