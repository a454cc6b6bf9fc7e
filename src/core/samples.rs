//! Built-in demo records used by the seed command

use crate::core::data::{ArticleData, JournalData};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn articles() -> Vec<ArticleData> {
    vec![
        ArticleData {
            journal_id: 1,
            title: "Building an Historical CRUD".to_string(),
            authors: strings(&["Dino Esposito"]),
            employers: strings(&["Software Architect & Digital Strategist"]),
            keywords: strings(&["Create", "Read", "Update", "Delete"]),
            text: "Relational databases have been around since the 1970s and a few generations of \
                   developers started and ended their careers without learning, or just mildly \
                   considering, an alternate approach to data storage. Recently, large social \
                   networks provided strong evidence that relational databases couldn't serve all \
                   possible business scenarios. When a (really) huge amount of schemaless data \
                   comes your way, relational databases might sometimes be a bottleneck rather \
                   than a pipe...."
                .to_string(),
            year: 2016,
        },
        ArticleData {
            journal_id: 1,
            title: "CRUD Operations - What is CRUD?".to_string(),
            authors: strings(&["Kolade Chris"]),
            employers: strings(&["Freelancer"]),
            keywords: strings(&["Create", "Read", "Update", "Delete"]),
            text: "In this article, I will show you what CRUD means, and what the individual terms \
                   mean and do. I will also show you how create, read, update, and delete \
                   operations work in the real world."
                .to_string(),
            year: 2022,
        },
        ArticleData {
            journal_id: 1,
            title: "What is a CRUD app and how to build one | Ultimate guide".to_string(),
            authors: strings(&["Joe Johnston"]),
            employers: strings(&["Freelancer"]),
            keywords: strings(&["CRUD", "app"]),
            text: "We use CRUD apps every day. Most of the time, without noticing. They keep us \
                   organized, they help digitise business processes, and they're critical to \
                   application development. But many of us are oblivious to what CRUD apps are, \
                   or how to build one."
                .to_string(),
            year: 2021,
        },
    ]
}

pub fn journals() -> Vec<JournalData> {
    let all = articles();
    let (first, second, third) = (all[0].clone(), all[1].clone(), all[2].clone());

    vec![
        JournalData {
            id: 1,
            title: "Trending Modern computer Technologies".to_string(),
            articles: vec![first.clone(), second.clone(), third.clone()],
            year: 2022,
            date: 0,
        },
        JournalData {
            id: 1,
            title: "Computers".to_string(),
            articles: vec![second.clone(), third],
            year: 2020,
            date: 0,
        },
        JournalData {
            id: 1,
            title: "IT industry".to_string(),
            articles: vec![first, second],
            year: 1996,
            date: 0,
        },
    ]
}
