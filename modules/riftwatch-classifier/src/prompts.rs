use ai_client::Message;
use riftwatch_common::Article;

/// System + user turns for the extraction prompt family. Requires the
/// model to answer with exactly the seven keys `extraction::from_json`
/// checks for.
pub fn extraction_messages(article: &Article) -> Vec<Message> {
    let system = "You are a conflict-monitoring analyst for Nigeria. Read the news \
article below and answer with a single JSON object, no prose, no markdown \
fences, containing exactly these keys: Event_Type (short phrase), State \
(a Nigerian state name), LGA (a local government area name), Severity \
(one of low, medium, high, critical), Sentiment_Intensity (integer \
0-100), Hate_Speech_Indicators (array of short phrases, may be empty), \
Conflict_Driver (one of economic, environmental, social). If the article \
does not describe a conflict-relevant event, still make your best-effort \
guess for every field.";

    let user = format!("Title: {}\n\nBody: {}", article.title, article.content);

    vec![Message::system(system), Message::user(user)]
}

/// System + user turns for the categorization prompt family.
pub fn categorization_messages(article: &Article) -> Vec<Message> {
    let system = "You are a conflict-monitoring analyst for Nigeria. Read the news \
article below and answer with a single JSON object, no prose, no markdown \
fences, containing exactly two keys: category (one of \"Banditry\", \
\"Kidnapping\", \"Gunmen Violence\", \"Farmer-Herder Clashes\", \"Unknown\") \
and confidence (integer 0-100, your confidence in that category).";

    let user = format!("Title: {}\n\nBody: {}", article.title, article.content);

    vec![Message::system(system), Message::user(user)]
}
