// Text processing — normalization, vocabulary and the document-term matrix.

pub mod dtm;
pub mod tokenizer;
