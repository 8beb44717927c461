use crate::Term;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "au","aux","avec","ce","ces","dans","de","des","du","elle","en","et","eux","il","ils",
            "je","la","le","les","leur","lui","ma","mais","me","même","mes","moi","mon","ne","nos",
            "notre","nous","on","ou","par","pas","pour","qu","que","qui","sa","se","ses","son","sur",
            "ta","te","tes","toi","ton","tu","un","une","vos","votre","vous",
            "c","d","j","l","à","m","n","s","t","y",
            "été","étée","étées","étés","étant","étante","étants","étantes",
            "suis","es","est","sommes","êtes","sont",
            "serai","seras","sera","serons","serez","seront",
            "serais","serait","serions","seriez","seraient",
            "étais","était","étions","étiez","étaient",
            "fus","fut","fûmes","fûtes","furent",
            "sois","soit","soyons","soyez","soient",
            "fusse","fusses","fût","fussions","fussiez","fussent",
            "ayant","ayante","ayantes","ayants","eu","eue","eues","eus",
            "ai","as","avons","avez","ont",
            "aurai","auras","aura","aurons","aurez","auront",
            "aurais","aurait","aurions","auriez","auraient",
            "avais","avait","avions","aviez","avaient",
            "eut","eûmes","eûtes","eurent",
            "aie","aies","ait","ayons","ayez","aient",
            "eusse","eusses","eût","eussions","eussiez","eussent"
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Lowercase, replace every ASCII punctuation character with a space, collapse whitespace and trim.
pub fn clean_text(text: &str) -> String {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect();
    WHITESPACE.replace_all(&lowered, " ").trim().to_string()
}

/// Normalize text into the terms of the vector space: cleaned, split on whitespace, French stopwords removed.
pub fn normalize(text: &str) -> Vec<Term> {
    clean_text(text)
        .split(' ')
        .filter(|token| !token.is_empty() && !is_stopword(token))
        .map(str::to_string)
        .collect()
}
