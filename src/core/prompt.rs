const ICD_INSTRUCTIONS: &str = "You are a medical coder. Based on the following medical chart, \
generate the icd10_diag codes in the given format:\n[LIST OF ICD-10 CODES]";

/// 建立 ICD-10 編碼提示詞，病歷文字原樣嵌入
pub fn build_icd_prompt(transcript: &str) -> String {
    format!("{ICD_INSTRUCTIONS}\n\nMedical Chart:\n{transcript}\n")
}
