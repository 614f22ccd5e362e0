pub const DEFAULT_DEPARTMENT_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, Copy)]
pub struct HeuristicItemDef {
    pub item: &'static str,
    pub principles: &'static [u8],
    pub weight: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct CitizenPrincipleDef {
    pub principle: u8,
    pub questions: &'static [&'static str],
}

/// Sub-portals, renamed agencies and duplicate legal names, keyed by the
/// whitespace-free department segment.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("개인정보포털", "개인정보보호위원회"),
    ("농식품ON", "농림축산식품부"),
    ("농업ON", "농림축산식품부"),
    ("인터넷우체국", "우정사업본부"),
    ("국고보조금통합관리", "행정안전부"),
    ("범죄경력회보서발급시스템", "법무부"),
    ("수출입무역통계", "관세청"),
    ("국세청대표누리집", "국세청"),
    ("대검찰청", "법무부"),
    ("정부입법지원센터", "법제처"),
    ("병무청대표누리집", "병무청"),
    ("실시간산불정보", "산림청"),
    ("중앙소방학교누리집", "소방청"),
    ("인재개발원누리집", "인사혁신처"),
    ("나라장터종합쇼핑몰", "조달청"),
    ("특허전자도서관", "특허청"),
    ("행정안전부_대한민국전자관보", "행정안전부"),
    ("성평등가족부", "여성가족부"),
    ("행정도시건설청", "행정중심복합도시건설청"),
    ("연안포털", "해양수산부"),
];

const BUILTIN_HEURISTIC_ITEMS: &[HeuristicItemDef] = &[
    HeuristicItemDef {
        item: "디자인_직관성간결성심미성_프로세스인식",
        principles: &[1, 2, 8],
        weight: 0.7,
    },
    HeuristicItemDef {
        item: "디자인_간결성심미성_시각적안정감",
        principles: &[8],
        weight: 0.8,
    },
    HeuristicItemDef {
        item: "디자인_직관성간결성심미성_강약조절",
        principles: &[8],
        weight: 0.7,
    },
    HeuristicItemDef {
        item: "디자인_직관성_가독성",
        principles: &[6, 8],
        weight: 0.9,
    },
    HeuristicItemDef {
        item: "디자인_직관성_주목성",
        principles: &[1, 6],
        weight: 0.7,
    },
    HeuristicItemDef {
        item: "디자인_간결성심미성_색상조화",
        principles: &[4, 8],
        weight: 0.6,
    },
    HeuristicItemDef {
        item: "디자인_일관성_디자인요소통일",
        principles: &[4],
        weight: 1.0,
    },
    HeuristicItemDef {
        item: "사용성_일관성_레이아웃일관성",
        principles: &[4],
        weight: 1.0,
    },
    HeuristicItemDef {
        item: "사용성_일관성_보편적레이아웃",
        principles: &[2, 4],
        weight: 0.8,
    },
    HeuristicItemDef {
        item: "사용성_직관성_서비스분류인지",
        principles: &[6],
        weight: 0.9,
    },
    HeuristicItemDef {
        item: "사용성_도움말_콘텐츠설명",
        principles: &[10],
        weight: 1.0,
    },
    HeuristicItemDef {
        item: "사용성_오류인식_경고메시지",
        principles: &[5, 9],
        weight: 1.0,
    },
    HeuristicItemDef {
        item: "사용성_유연성효율성_주요기능접근",
        principles: &[7],
        weight: 1.0,
    },
    HeuristicItemDef {
        item: "사용성_직관성_메뉴이동",
        principles: &[3, 6, 7],
        weight: 0.8,
    },
];

const BUILTIN_CITIZEN_PRINCIPLES: &[CitizenPrincipleDef] = &[
    CitizenPrincipleDef {
        principle: 1,
        questions: &["Q1", "Q2"],
    },
    CitizenPrincipleDef {
        principle: 2,
        questions: &["Q3", "Q4"],
    },
    CitizenPrincipleDef {
        principle: 3,
        questions: &["Q5"],
    },
    CitizenPrincipleDef {
        principle: 4,
        questions: &["Q6", "Q7"],
    },
    CitizenPrincipleDef {
        principle: 5,
        questions: &["Q8"],
    },
    CitizenPrincipleDef {
        principle: 6,
        questions: &["Q9"],
    },
    CitizenPrincipleDef {
        principle: 7,
        questions: &["Q10"],
    },
    CitizenPrincipleDef {
        principle: 8,
        questions: &["Q6"],
    },
    CitizenPrincipleDef {
        principle: 9,
        questions: &["Q8"],
    },
    CitizenPrincipleDef {
        principle: 10,
        questions: &["Q9"],
    },
];

pub fn builtin_aliases() -> &'static [(&'static str, &'static str)] {
    BUILTIN_ALIASES
}

pub fn builtin_heuristic_items() -> &'static [HeuristicItemDef] {
    BUILTIN_HEURISTIC_ITEMS
}

pub fn builtin_citizen_principles() -> &'static [CitizenPrincipleDef] {
    BUILTIN_CITIZEN_PRINCIPLES
}
